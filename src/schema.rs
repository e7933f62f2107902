//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 特性开关数据模型
//!
//! 定义特性开关文档（v2.0.0 schema）的序列化结构，以及评估结果类型。
//!
//! # 说明
//!
//! 引擎只读取这些结构，从不修改。变体配置值与过滤器参数对引擎是
//! 不透明的结构化数据（`serde_json::Value`），由各过滤器自行解码。

use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// 特性开关文档
// ============================================================================

/// 特性开关文档根节点
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureManagement {
    /// 特性开关列表
    #[serde(default)]
    pub feature_flags: Vec<FeatureFlag>,
}

/// 特性开关定义
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureFlag {
    /// 特性唯一标识（必填，非空）
    pub id: String,
    /// 特性用途描述
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 用于展示的友好名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// 特性是否开启
    #[serde(default)]
    pub enabled: bool,
    /// 动态启用条件
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    /// 特性的多个配置变体
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantDefinition>,
    /// 变体分配规则
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<VariantAllocation>,
    /// 遥测配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetryOptions>,
}

/// 动态启用条件
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Conditions {
    /// 过滤器组合策略（Any/All，默认Any）
    #[serde(default)]
    pub requirement_type: RequirementType,
    /// 客户端过滤器列表（按声明顺序评估）
    #[serde(default)]
    pub client_filters: Vec<ClientFilter>,
}

/// 客户端过滤器声明
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientFilter {
    /// 过滤器注册名称
    pub name: String,
    /// 过滤器参数（不透明映射，由过滤器自行解码）
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
}

/// 过滤器组合策略
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequirementType {
    /// 任一过滤器通过即启用
    #[default]
    Any,
    /// 所有过滤器通过才启用
    All,
}

// ============================================================================
// 变体
// ============================================================================

/// 变体定义
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VariantDefinition {
    /// 变体名称（在一个特性内唯一）
    pub name: String,
    /// 变体配置值（不透明结构化数据）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_value: Option<Value>,
    /// 分配该变体时对启用状态的覆盖
    #[serde(default)]
    pub status_override: StatusOverride,
}

/// 变体状态覆盖
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusOverride {
    /// 不覆盖
    #[default]
    None,
    /// 强制启用
    Enabled,
    /// 强制禁用
    Disabled,
}

/// 变体分配规则
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VariantAllocation {
    /// 特性禁用时的默认变体
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_when_disabled: Option<String>,
    /// 特性启用时的默认变体
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_when_enabled: Option<String>,
    /// 按用户分配（按声明顺序）
    #[serde(default)]
    pub user: Vec<UserAllocation>,
    /// 按组分配（按声明顺序）
    #[serde(default)]
    pub group: Vec<GroupAllocation>,
    /// 按百分位区间分配（按声明顺序）
    #[serde(default)]
    pub percentile: Vec<PercentileAllocation>,
    /// 百分位计算的种子，用于跨特性去相关
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

/// 用户分配项
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserAllocation {
    /// 变体名称
    pub variant: String,
    /// 目标用户ID集合
    pub users: Vec<String>,
}

/// 组分配项
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupAllocation {
    /// 变体名称
    pub variant: String,
    /// 目标组ID集合
    pub groups: Vec<String>,
}

/// 百分位分配项
///
/// 区间为 `[from, to)`，`to` 等于100时上界包含（见 percentile 模块）。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PercentileAllocation {
    /// 变体名称
    pub variant: String,
    /// 区间下界（0-100）
    pub from: f64,
    /// 区间上界（0-100）
    pub to: f64,
}

// ============================================================================
// 遥测与评估结果
// ============================================================================

/// 特性开关遥测配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TelemetryOptions {
    /// 是否对该特性启用遥测
    #[serde(default)]
    pub enabled: bool,
    /// 随遥测附带的元数据
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// 变体分配原因
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum VariantAssignmentReason {
    /// 未分配变体
    #[default]
    None,
    /// 特性禁用时的默认变体
    DefaultWhenDisabled,
    /// 特性启用时的默认变体
    DefaultWhenEnabled,
    /// 按用户ID分配
    User,
    /// 按组分配
    Group,
    /// 按百分位分配
    Percentile,
}

/// 分配给调用方的变体
///
/// `get_variant` 的返回类型，只携带名称与配置值。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// 变体名称
    pub name: String,
    /// 变体配置值
    pub configuration_value: Option<Value>,
}

impl From<&VariantDefinition> for Variant {
    fn from(definition: &VariantDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            configuration_value: definition.configuration_value.clone(),
        }
    }
}

/// 一次特性开关评估的结果
///
/// 每次评估调用新建，引擎不缓存、不持久化。
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// 被评估的特性开关
    pub feature: FeatureFlag,
    /// 评估后的最终启用状态
    pub enabled: bool,
    /// 用于一致性定向的标识（通常为用户ID）
    pub targeting_id: String,
    /// 选中的变体（可能为空）
    pub variant: Option<VariantDefinition>,
    /// 变体分配原因
    pub variant_assignment_reason: VariantAssignmentReason,
}
