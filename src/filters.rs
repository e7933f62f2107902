//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 过滤器契约与注册表
//!
//! 提供 FeatureFilter trait 作为过滤器接口，以及按名称索引的注册表。
//!
//! # 特性
//!
//! - 定义 FeatureFilter trait 作为过滤器接口（名称 + 评估）
//! - 内置过滤器与调用方自定义过滤器共用同一契约
//! - 注册表在管理器构造时一次性填充，此后只读（见并发模型）
//! - 新增过滤器通过注册实现，无需修改评估器
//!
//! # 示例
//!
//! ```rust
//! use flagron::filters::{FeatureFilter, FilterEvaluationContext};
//! use flagron::audience::TargetingContext;
//! use flagron::error::FlagronError;
//!
//! struct EnvironmentFilter {
//!     environment: String,
//! }
//!
//! impl FeatureFilter for EnvironmentFilter {
//!     fn name(&self) -> &str {
//!         "EnvironmentFilter"
//!     }
//!
//!     fn evaluate(
//!         &self,
//!         eval_ctx: &FilterEvaluationContext<'_>,
//!         _app_ctx: Option<&TargetingContext>,
//!     ) -> Result<bool, FlagronError> {
//!         let expected = eval_ctx
//!             .parameters
//!             .get("environment")
//!             .and_then(|value| value.as_str())
//!             .ok_or_else(|| {
//!                 FlagronError::ParameterError("缺少'environment'参数".to_string())
//!             })?;
//!         Ok(expected == self.environment)
//!     }
//! }
//! ```

use crate::audience::TargetingContext;
use crate::constants::MAX_FILTER_NAME_LENGTH;
use crate::error::FlagronError;
use ahash::AHashMap as HashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// 过滤器契约
// ============================================================================

/// 过滤器评估上下文
///
/// 携带被评估特性的名称与该过滤器在开关文档中声明的参数。
/// 参数是不透明的JSON映射，由过滤器自行解码并校验；参数非法时
/// 过滤器必须返回错误而不是静默降级（除非规范明确要求软失败）。
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluationContext<'a> {
    /// 被评估的特性名称
    pub feature_name: &'a str,
    /// 过滤器参数
    pub parameters: &'a serde_json::Map<String, Value>,
}

/// 特性过滤器 trait
///
/// 所有过滤器（内置与自定义）都需要实现此trait。
pub trait FeatureFilter: Send + Sync {
    /// 获取过滤器名称
    ///
    /// # 返回
    /// - 过滤器的唯一标识符，作为注册表键，必须稳定
    fn name(&self) -> &str;

    /// 评估过滤器
    ///
    /// # 参数
    /// - `eval_ctx`: 评估上下文（特性名称与过滤器参数）
    /// - `app_ctx`: 调用方传入的定向上下文（可能为空）
    ///
    /// # 返回
    /// - `Ok(true)`: 条件满足
    /// - `Ok(false)`: 条件不满足
    /// - `Err(_)`: 参数非法或缺少必需的上下文
    fn evaluate(
        &self,
        eval_ctx: &FilterEvaluationContext<'_>,
        app_ctx: Option<&TargetingContext>,
    ) -> Result<bool, FlagronError>;
}

// ============================================================================
// 过滤器注册表
// ============================================================================

/// 验证过滤器名称
///
/// # 返回
/// - `Ok(())`: 验证通过
/// - `Err(FlagronError)`: 名称为空、过长或包含非法字符
fn validate_filter_name(name: &str) -> Result<(), FlagronError> {
    if name.is_empty() {
        return Err(FlagronError::RegistryError(
            "过滤器名称不能为空".to_string(),
        ));
    }

    if name.len() > MAX_FILTER_NAME_LENGTH {
        return Err(FlagronError::RegistryError(format!(
            "过滤器名称长度超过限制（最大 {} 字符）",
            MAX_FILTER_NAME_LENGTH
        )));
    }

    // 只允许字母、数字、点、下划线和连字符
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        return Err(FlagronError::RegistryError(
            "过滤器名称只能包含字母、数字、点、下划线和连字符".to_string(),
        ));
    }

    Ok(())
}

/// 过滤器注册表
///
/// 按名称索引的过滤器表。注册表在 FeatureManager 构造期间一次性填充，
/// 首次评估后视为不可变，因此查询路径无需加锁。
#[derive(Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<dyn FeatureFilter>>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

impl FilterRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// 注册过滤器
    ///
    /// # 参数
    /// - `filter`: 过滤器实例（以自身 `name()` 作为注册键）
    ///
    /// # 返回
    /// - `Ok(())`: 注册成功
    /// - `Err(FlagronError::RegistryError)`: 名称非法或已存在
    pub fn register(&mut self, filter: Arc<dyn FeatureFilter>) -> Result<(), FlagronError> {
        let name = filter.name().to_string();
        validate_filter_name(&name)?;

        if self.filters.contains_key(&name) {
            let error_msg = format!("过滤器 '{}' 已存在", name);
            warn!("{}", error_msg);
            return Err(FlagronError::RegistryError(error_msg));
        }

        debug!("注册过滤器: {}", name);
        self.filters.insert(name, filter);

        Ok(())
    }

    /// 查询过滤器
    ///
    /// # 返回
    /// - `Some(filter)`: 找到过滤器
    /// - `None`: 未找到过滤器
    pub fn get(&self, name: &str) -> Option<&Arc<dyn FeatureFilter>> {
        self.filters.get(name)
    }

    /// 检查过滤器是否存在
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// 获取所有注册的过滤器名称
    pub fn names(&self) -> Vec<String> {
        self.filters.keys().cloned().collect()
    }

    /// 获取注册的过滤器数量
    pub fn count(&self) -> usize {
        self.filters.len()
    }
}
