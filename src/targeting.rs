//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 定向过滤器
//!
//! 内置的受众定向过滤器，决定一个定向上下文是否落在灰度发布范围内。
//!
//! # 评估顺序（短路）
//!
//! 1. 排除用户列表命中 → 拒绝
//! 2. 排除组列表命中 → 拒绝
//! 3. 直接定向用户命中 → 接受
//! 4. 按声明顺序检查定向组，命中且通过该组的百分位检查 → 接受
//! 5. 默认灰度百分比的百分位检查
//!
//! 排除永远优先于任何接受规则。

use crate::audience::{is_targeted_group, is_targeted_user, TargetingContext};
use crate::constants::TARGETING_FILTER_NAME;
use crate::error::FlagronError;
use crate::filters::{FeatureFilter, FilterEvaluationContext};
use crate::percentile::is_targeted_percentile;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

// ============================================================================
// 参数
// ============================================================================

/// 定向过滤器参数
///
/// 过滤器参数在开关文档里既可能以 schema 的 snake_case 书写，也可能
/// 沿用上游文档的 PascalCase 书写，两种拼写都接受。
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TargetingFilterParameters {
    /// 受众定义
    #[serde(default, alias = "Audience")]
    pub audience: TargetingAudience,
}

/// 受众定义
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TargetingAudience {
    /// 默认灰度百分比（0-100）
    #[serde(default, alias = "DefaultRolloutPercentage")]
    pub default_rollout_percentage: f64,
    /// 直接定向的用户ID列表
    #[serde(default, alias = "Users")]
    pub users: Vec<String>,
    /// 定向组列表（各自带灰度百分比，按声明顺序评估）
    #[serde(default, alias = "Groups")]
    pub groups: Vec<TargetingGroup>,
    /// 明确排除的用户与组
    #[serde(default, alias = "Exclusion")]
    pub exclusion: Option<TargetingExclusion>,
}

/// 带灰度百分比的定向组
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TargetingGroup {
    /// 组名
    #[serde(default, alias = "Name")]
    pub name: String,
    /// 该组的灰度百分比（0-100）
    #[serde(default, alias = "RolloutPercentage")]
    pub rollout_percentage: f64,
}

/// 定向排除列表
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TargetingExclusion {
    /// 被排除的用户ID列表
    #[serde(default, alias = "Users")]
    pub users: Vec<String>,
    /// 被排除的组列表
    #[serde(default, alias = "Groups")]
    pub groups: Vec<String>,
}

// ============================================================================
// 过滤器实现
// ============================================================================

/// 内置定向过滤器
#[derive(Debug, Default)]
pub struct TargetingFilter;

impl TargetingFilter {
    /// 创建定向过滤器
    pub fn new() -> Self {
        Self
    }

    /// 解码并校验定向参数
    ///
    /// 灰度百分比越界是硬校验错误，直接返回给调用方而不是按false处理。
    fn parse_parameters(
        eval_ctx: &FilterEvaluationContext<'_>,
    ) -> Result<TargetingFilterParameters, FlagronError> {
        let params: TargetingFilterParameters =
            serde_json::from_value(Value::Object(eval_ctx.parameters.clone())).map_err(|e| {
                FlagronError::ParameterError(format!(
                    "特性 '{}' 的定向参数格式无效: {}",
                    eval_ctx.feature_name, e
                ))
            })?;

        let default_rollout = params.audience.default_rollout_percentage;
        if !(0.0..=100.0).contains(&default_rollout) {
            return Err(FlagronError::ParameterError(format!(
                "特性 '{}' 的默认灰度百分比必须在0到100之间",
                eval_ctx.feature_name
            )));
        }

        for group in &params.audience.groups {
            if !(0.0..=100.0).contains(&group.rollout_percentage) {
                return Err(FlagronError::ParameterError(format!(
                    "特性 '{}' 的组 '{}' 灰度百分比必须在0到100之间",
                    eval_ctx.feature_name, group.name
                )));
            }
        }

        Ok(params)
    }
}

impl FeatureFilter for TargetingFilter {
    fn name(&self) -> &str {
        TARGETING_FILTER_NAME
    }

    fn evaluate(
        &self,
        eval_ctx: &FilterEvaluationContext<'_>,
        app_ctx: Option<&TargetingContext>,
    ) -> Result<bool, FlagronError> {
        let params = Self::parse_parameters(eval_ctx)?;

        // 定向离不开上下文，缺失即为错误
        let targeting_ctx = app_ctx.ok_or_else(|| {
            FlagronError::ContextError("定向过滤器需要调用方提供定向上下文".to_string())
        })?;

        let audience = &params.audience;

        // 排除检查优先于一切接受规则
        if let Some(exclusion) = &audience.exclusion {
            if !targeting_ctx.user_id.is_empty()
                && is_targeted_user(&targeting_ctx.user_id, &exclusion.users)
            {
                trace!(
                    feature = eval_ctx.feature_name,
                    user = %targeting_ctx.user_id,
                    "用户在排除列表中"
                );
                return Ok(false);
            }

            if !targeting_ctx.groups.is_empty()
                && is_targeted_group(&targeting_ctx.groups, &exclusion.groups)
            {
                trace!(feature = eval_ctx.feature_name, "用户所属组在排除列表中");
                return Ok(false);
            }
        }

        // 直接定向用户
        if is_targeted_user(&targeting_ctx.user_id, &audience.users) {
            trace!(
                feature = eval_ctx.feature_name,
                user = %targeting_ctx.user_id,
                "用户被直接定向"
            );
            return Ok(true);
        }

        // 按声明顺序检查定向组，每组有独立的灰度百分比
        if !targeting_ctx.groups.is_empty() {
            for group in &audience.groups {
                if is_targeted_group(&targeting_ctx.groups, std::slice::from_ref(&group.name)) {
                    let hint = format!("{}\n{}", eval_ctx.feature_name, group.name);
                    if is_targeted_percentile(
                        &targeting_ctx.user_id,
                        &hint,
                        0.0,
                        group.rollout_percentage,
                    )? {
                        trace!(
                            feature = eval_ctx.feature_name,
                            group = %group.name,
                            "用户落在组灰度范围内"
                        );
                        return Ok(true);
                    }
                }
            }
        }

        // 默认灰度百分比
        is_targeted_percentile(
            &targeting_ctx.user_id,
            eval_ctx.feature_name,
            0.0,
            audience.default_rollout_percentage,
        )
    }
}
