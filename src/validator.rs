//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 特性开关定义校验
//!
//! 评估前的结构校验。枚举值（requirement_type、status_override）的合法性
//! 已由schema解码保证，这里校验解码无法表达的约束：非空ID、非空名称、
//! 非空目标集合、百分位区间范围。校验失败整体中止，不产生部分结果。

use crate::error::FlagronError;
use crate::schema::{Conditions, FeatureFlag, VariantAllocation, VariantDefinition};

/// 校验单个特性开关定义
///
/// # 返回
/// - `Ok(())`: 定义结构合法
/// - `Err(FlagronError::ValidationError)`: 带具体位置的描述性错误
pub fn validate_feature_flag(flag: &FeatureFlag) -> Result<(), FlagronError> {
    if flag.id.is_empty() {
        return Err(FlagronError::ValidationError(
            "特性开关ID不能为空".to_string(),
        ));
    }

    if let Some(conditions) = &flag.conditions {
        validate_conditions(&flag.id, conditions)?;
    }

    if !flag.variants.is_empty() {
        validate_variants(&flag.id, &flag.variants)?;
    }

    if let Some(allocation) = &flag.allocation {
        validate_allocation(&flag.id, allocation)?;
    }

    Ok(())
}

fn validate_conditions(id: &str, conditions: &Conditions) -> Result<(), FlagronError> {
    for (index, filter) in conditions.client_filters.iter().enumerate() {
        if filter.name.is_empty() {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 第{}个客户端过滤器缺少名称",
                id, index
            )));
        }
    }

    Ok(())
}

fn validate_variants(id: &str, variants: &[VariantDefinition]) -> Result<(), FlagronError> {
    for (index, variant) in variants.iter().enumerate() {
        if variant.name.is_empty() {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 第{}个变体缺少名称",
                id, index
            )));
        }
    }

    Ok(())
}

fn validate_allocation(id: &str, allocation: &VariantAllocation) -> Result<(), FlagronError> {
    for (index, user_allocation) in allocation.user.iter().enumerate() {
        if user_allocation.variant.is_empty() {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 第{}个用户分配缺少变体名称",
                id, index
            )));
        }

        if user_allocation.users.is_empty() {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 第{}个用户分配的用户列表为空",
                id, index
            )));
        }
    }

    for (index, group_allocation) in allocation.group.iter().enumerate() {
        if group_allocation.variant.is_empty() {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 第{}个组分配缺少变体名称",
                id, index
            )));
        }

        if group_allocation.groups.is_empty() {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 第{}个组分配的组列表为空",
                id, index
            )));
        }
    }

    for (index, percentile_allocation) in allocation.percentile.iter().enumerate() {
        if percentile_allocation.variant.is_empty() {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 第{}个百分位分配缺少变体名称",
                id, index
            )));
        }

        if !(0.0..=100.0).contains(&percentile_allocation.from) {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 百分位下界'from'必须在0到100之间",
                id
            )));
        }

        if !(0.0..=100.0).contains(&percentile_allocation.to) {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 百分位上界'to'必须在0到100之间",
                id
            )));
        }

        if percentile_allocation.from > percentile_allocation.to {
            return Err(FlagronError::ValidationError(format!(
                "特性开关 '{}': 百分位下界'from'不能大于上界'to'",
                id
            )));
        }
    }

    Ok(())
}
