//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 变体分配
//!
//! 依据分配规则为定向上下文选择变体：用户分配 → 组分配 → 百分位分配，
//! 全函数范围内首个命中即停止。默认变体回退由编排器处理。

use crate::audience::{is_targeted_group, is_targeted_user, TargetingContext};
use crate::constants::ALLOCATION_HINT_PREFIX;
use crate::error::FlagronError;
use crate::percentile::is_targeted_percentile;
use crate::schema::{FeatureFlag, VariantAssignmentReason, VariantDefinition};
use tracing::{trace, warn};

/// 按分配规则为上下文选择变体名称
///
/// 特性未声明分配规则时不应调用本函数（编排器跳过该步骤）。
///
/// # 评估顺序（首个命中即停止）
///
/// 1. 用户分配：按声明顺序，首个用户集合包含上下文用户的条目
/// 2. 组分配：按声明顺序，首个组集合与上下文组相交的条目
/// 3. 百分位分配：hint取配置的seed，未配置时合成为
///    `"allocation\n" + 特性ID`；按声明顺序找到首个包含桶值的区间
///
/// # 返回
/// - `Ok(Some((名称, 原因)))`: 命中某条分配规则
/// - `Ok(None)`: 无规则命中（由编排器回退到默认变体）
/// - `Err(_)`: 百分位区间非法
pub fn assign_variant(
    flag: &FeatureFlag,
    ctx: Option<&TargetingContext>,
) -> Result<Option<(String, VariantAssignmentReason)>, FlagronError> {
    let allocation = match &flag.allocation {
        Some(allocation) => allocation,
        None => return Ok(None),
    };

    let empty_groups: [String; 0] = [];
    let (user_id, groups): (&str, &[String]) = match ctx {
        Some(ctx) => (&ctx.user_id, &ctx.groups),
        None => ("", &empty_groups),
    };

    for user_allocation in &allocation.user {
        if is_targeted_user(user_id, &user_allocation.users) {
            trace!(
                feature = %flag.id,
                variant = %user_allocation.variant,
                "variant assigned by user allocation"
            );
            return Ok(Some((
                user_allocation.variant.clone(),
                VariantAssignmentReason::User,
            )));
        }
    }

    for group_allocation in &allocation.group {
        if is_targeted_group(groups, &group_allocation.groups) {
            trace!(
                feature = %flag.id,
                variant = %group_allocation.variant,
                "variant assigned by group allocation"
            );
            return Ok(Some((
                group_allocation.variant.clone(),
                VariantAssignmentReason::Group,
            )));
        }
    }

    if !allocation.percentile.is_empty() {
        // seed用于跨特性去相关；未配置时由特性ID合成
        let hint = match &allocation.seed {
            Some(seed) if !seed.is_empty() => seed.clone(),
            _ => format!("{}\n{}", ALLOCATION_HINT_PREFIX, flag.id),
        };

        for percentile_allocation in &allocation.percentile {
            if is_targeted_percentile(
                user_id,
                &hint,
                percentile_allocation.from,
                percentile_allocation.to,
            )? {
                trace!(
                    feature = %flag.id,
                    variant = %percentile_allocation.variant,
                    "variant assigned by percentile allocation"
                );
                return Ok(Some((
                    percentile_allocation.variant.clone(),
                    VariantAssignmentReason::Percentile,
                )));
            }
        }
    }

    Ok(None)
}

/// 按名称在特性的变体列表中解析变体定义
///
/// 分配规则引用了不存在的变体名时按"无变体"处理并告警，不作为硬错误，
/// 避免一处配置笔误让整个特性的评估崩溃。
pub fn resolve_variant<'a>(flag: &'a FeatureFlag, name: &str) -> Option<&'a VariantDefinition> {
    let variant = flag.variants.iter().find(|variant| variant.name == name);

    if variant.is_none() {
        warn!(
            feature = %flag.id,
            variant = name,
            "allocation references a variant that is not defined, treating as no variant"
        );
    }

    variant
}
