//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 条件评估
//!
//! 按声明顺序评估特性开关的过滤器列表，并依据组合策略（Any/All）短路。
//!
//! # 特性
//!
//! - 短路逻辑：Any遇真即真，All遇假即假
//! - 未注册的过滤器名称使整个特性按禁用处理（软失败，不报错）
//! - 过滤器自身的错误中止该特性的评估并向上传播

use crate::audience::TargetingContext;
use crate::error::FlagronError;
use crate::filters::{FilterEvaluationContext, FilterRegistry};
use crate::schema::{FeatureFlag, RequirementType};
use tracing::{debug, trace, warn};

/// 评估特性开关的启用条件
///
/// # 算法
///
/// 特性未标记启用时直接返回false，不运行任何过滤器。启用且未声明过滤器
/// 时返回true。否则以 `short_circuit = (requirement_type == Any)` 为短路
/// 值遍历过滤器：某个过滤器的结果等于短路值时立即返回短路值；遍历完成
/// 未短路则返回其反值。同一个循环同时实现了AND与OR语义。
///
/// # 返回
/// - `Ok(enabled)`: 条件评估结果
/// - `Err(_)`: 某个过滤器评估出错
pub fn evaluate_conditions(
    flag: &FeatureFlag,
    registry: &FilterRegistry,
    app_ctx: Option<&TargetingContext>,
) -> Result<bool, FlagronError> {
    if !flag.enabled {
        trace!(feature = %flag.id, "feature is off, skipping filters");
        return Ok(false);
    }

    let client_filters = match &flag.conditions {
        Some(conditions) if !conditions.client_filters.is_empty() => &conditions.client_filters,
        // 无条件或条件为空：开启即启用
        _ => return Ok(true),
    };

    let requirement_type = flag
        .conditions
        .as_ref()
        .map(|conditions| conditions.requirement_type)
        .unwrap_or_default();
    let short_circuit = requirement_type == RequirementType::Any;

    debug!(
        feature = %flag.id,
        ?requirement_type,
        filters = client_filters.len(),
        "evaluating client filters"
    );

    for client_filter in client_filters {
        let filter = match registry.get(&client_filter.name) {
            Some(filter) => filter,
            None => {
                // 引用了未注册的过滤器：整个特性按禁用处理（保守降级）
                warn!(
                    feature = %flag.id,
                    filter = %client_filter.name,
                    "filter is not registered, treating feature as disabled"
                );
                return Ok(false);
            }
        };

        let eval_ctx = FilterEvaluationContext {
            feature_name: &flag.id,
            parameters: &client_filter.parameters,
        };

        let result = filter.evaluate(&eval_ctx, app_ctx)?;
        trace!(feature = %flag.id, filter = %client_filter.name, result, "filter evaluated");

        if result == short_circuit {
            debug!(
                feature = %flag.id,
                filter = %client_filter.name,
                "short-circuited by filter"
            );
            return Ok(short_circuit);
        }
    }

    Ok(!short_circuit)
}
