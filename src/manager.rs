//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 特性开关评估编排器
//!
//! `FeatureManager` 将数据源、过滤器注册表、条件评估与变体分配组合成
//! 完整的评估管线，并向注册的观察者派发评估结果。
//!
//! # 评估管线
//!
//! 1. 从数据源取得特性开关定义
//! 2. 结构校验（校验失败整体中止）
//! 3. 条件评估得到基础启用状态
//! 4. 变体选择（分配规则 → 默认变体回退）
//! 5. 变体状态覆盖修正最终启用状态
//! 6. 按遥测配置派发观察者回调
//!
//! # 示例
//!
//! ```rust
//! use std::sync::Arc;
//! use flagron::audience::TargetingContext;
//! use flagron::manager::FeatureManager;
//! use flagron::provider::InMemoryProvider;
//!
//! let provider = InMemoryProvider::from_json(
//!     r#"{"feature_flags": [{"id": "Beta", "enabled": true}]}"#,
//! ).unwrap();
//! let manager = FeatureManager::new(Arc::new(provider)).unwrap();
//!
//! let ctx = TargetingContext::for_user("Alice");
//! assert!(manager.is_enabled_with_context("Beta", &ctx).unwrap());
//! ```

use crate::audience::TargetingContext;
use crate::conditions::evaluate_conditions;
use crate::error::FlagronError;
use crate::filters::{FeatureFilter, FilterRegistry};
use crate::provider::FeatureFlagProvider;
use crate::schema::{
    EvaluationResult, FeatureFlag, StatusOverride, Variant, VariantAssignmentReason,
};
use crate::targeting::TargetingFilter;
use crate::time_window::TimeWindowFilter;
use crate::validator::validate_feature_flag;
use crate::variant::{assign_variant, resolve_variant};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// 评估结果观察者回调
pub type EvaluationObserver = Box<dyn Fn(&EvaluationResult) + Send + Sync>;

/// 特性开关评估编排器
///
/// 构造后不可变（观察者列表除外），可安全地在线程间共享。
/// 每次评估都是独立的纯计算，不缓存结果。
pub struct FeatureManager {
    provider: Arc<dyn FeatureFlagProvider>,
    registry: FilterRegistry,
    observers: RwLock<Vec<EvaluationObserver>>,
}

impl FeatureManager {
    /// 创建编排器并注册内置过滤器
    ///
    /// # 参数
    /// - `provider`: 特性开关数据源
    ///
    /// # 返回
    /// - `Ok(manager)`: 已注册定向过滤器与时间窗口过滤器
    pub fn new(provider: Arc<dyn FeatureFlagProvider>) -> Result<Self, FlagronError> {
        let mut registry = FilterRegistry::new();
        registry.register(Arc::new(TargetingFilter::new()))?;
        registry.register(Arc::new(TimeWindowFilter::new()))?;

        Ok(Self {
            provider,
            registry,
            observers: RwLock::new(Vec::new()),
        })
    }

    /// 注册自定义过滤器（消费并返回自身，便于链式构造）
    ///
    /// # 返回
    /// - `Err(FlagronError::RegistryError)`: 名称非法或与已注册过滤器重复
    pub fn with_filter(mut self, filter: Arc<dyn FeatureFilter>) -> Result<Self, FlagronError> {
        self.registry.register(filter)?;
        Ok(self)
    }

    /// 注册评估结果观察者
    ///
    /// 仅当特性的遥测配置开启时才会收到该特性的评估结果。
    /// 回调在评估线程上同步执行，应保持轻量。
    pub fn on_feature_evaluated(&self, observer: EvaluationObserver) {
        self.observers.write().push(observer);
    }

    /// 列举数据源中的所有特性开关ID
    pub fn feature_names(&self) -> Result<Vec<String>, FlagronError> {
        self.provider
            .feature_names()
            .map_err(|e| FlagronError::provider("*", e))
    }

    /// 判断特性是否启用（无定向上下文）
    ///
    /// 引用定向过滤器的特性在无上下文时会返回
    /// `FlagronError::ContextError`。
    pub fn is_enabled(&self, name: &str) -> Result<bool, FlagronError> {
        Ok(self.evaluate(name, None)?.enabled)
    }

    /// 判断特性对给定定向上下文是否启用
    pub fn is_enabled_with_context(
        &self,
        name: &str,
        ctx: &TargetingContext,
    ) -> Result<bool, FlagronError> {
        Ok(self.evaluate(name, Some(ctx))?.enabled)
    }

    /// 取得分配给定向上下文的变体
    ///
    /// # 返回
    /// - `Ok(Some(variant))`: 分配到的变体
    /// - `Ok(None)`: 特性未定义变体、无规则命中或引用了未定义的变体名
    pub fn get_variant(
        &self,
        name: &str,
        ctx: &TargetingContext,
    ) -> Result<Option<Variant>, FlagronError> {
        let result = self.evaluate(name, Some(ctx))?;
        Ok(result.variant.as_ref().map(Variant::from))
    }

    /// 执行完整评估管线
    ///
    /// # 返回
    /// - `Ok(result)`: 携带最终启用状态、变体与分配原因的评估结果
    /// - `Err(_)`: 数据源、校验、过滤器或分配任一阶段出错
    #[instrument(skip(self, ctx), fields(feature = name))]
    pub fn evaluate(
        &self,
        name: &str,
        ctx: Option<&TargetingContext>,
    ) -> Result<EvaluationResult, FlagronError> {
        let flag = self
            .provider
            .feature_flag(name)
            .map_err(|e| FlagronError::provider(name, e))?;

        validate_feature_flag(&flag)?;

        let base_enabled = evaluate_conditions(&flag, &self.registry, ctx)?;

        let (variant, reason) = self.select_variant(&flag, base_enabled, ctx)?;

        // 状态覆盖只修正已启用的特性；禁用态的默认变体不能把特性拉起
        let enabled = match &variant {
            Some(variant) if base_enabled && variant.status_override == StatusOverride::Disabled => {
                debug!(feature = %flag.id, variant = %variant.name, "variant overrides status to disabled");
                false
            }
            _ => base_enabled,
        };

        let result = EvaluationResult {
            targeting_id: ctx.map(|ctx| ctx.user_id.clone()).unwrap_or_default(),
            feature: flag,
            enabled,
            variant,
            variant_assignment_reason: reason,
        };

        trace!(
            feature = %result.feature.id,
            enabled = result.enabled,
            reason = ?result.variant_assignment_reason,
            "feature evaluated"
        );

        self.publish(&result);
        Ok(result)
    }

    /// 变体选择：分配规则优先，未命中回退到默认变体
    fn select_variant(
        &self,
        flag: &FeatureFlag,
        enabled: bool,
        ctx: Option<&TargetingContext>,
    ) -> Result<
        (
            Option<crate::schema::VariantDefinition>,
            VariantAssignmentReason,
        ),
        FlagronError,
    > {
        if flag.variants.is_empty() {
            return Ok((None, VariantAssignmentReason::None));
        }

        let allocation = match &flag.allocation {
            Some(allocation) => allocation,
            None => return Ok((None, VariantAssignmentReason::None)),
        };

        let (name, reason) = if !enabled {
            match &allocation.default_when_disabled {
                Some(name) => (name.clone(), VariantAssignmentReason::DefaultWhenDisabled),
                None => return Ok((None, VariantAssignmentReason::None)),
            }
        } else if let Some((name, reason)) = assign_variant(flag, ctx)? {
            (name, reason)
        } else {
            match &allocation.default_when_enabled {
                Some(name) => (name.clone(), VariantAssignmentReason::DefaultWhenEnabled),
                None => return Ok((None, VariantAssignmentReason::None)),
            }
        };

        // 引用了未定义的变体名按"无变体"处理（resolve_variant内部已告警）
        match resolve_variant(flag, &name) {
            Some(variant) => Ok((Some(variant.clone()), reason)),
            None => Ok((None, VariantAssignmentReason::None)),
        }
    }

    /// 按遥测配置派发评估结果
    fn publish(&self, result: &EvaluationResult) {
        let telemetry_enabled = result
            .feature
            .telemetry
            .as_ref()
            .map(|telemetry| telemetry.enabled)
            .unwrap_or(false);

        if !telemetry_enabled {
            return;
        }

        let observers = self.observers.read();
        for observer in observers.iter() {
            observer(result);
        }
    }
}
