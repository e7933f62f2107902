//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 百分位桶计算
//!
//! 将任意字符串确定性地映射到 [0,100] 的伪随机值，用于一致性灰度发布。
//! 同一输入在任何进程、任何实现中必须得到完全相同的桶值，因此算法
//! 逐字节固定：SHA-256 摘要取前4字节按小端序解释为u32，再线性缩放。

use crate::constants::PERCENTILE_SCALE;
use crate::error::FlagronError;
use sha2::{Digest, Sha256};

/// 计算字符串的百分位桶值
///
/// # 参数
/// - `key`: 任意字符串（UTF-8）
///
/// # 返回
/// - `[0, 100]` 区间内的确定性伪随机值（仅当前4字节全为1时达到100）
///
/// # 示例
/// ```rust
/// use flagron::percentile::bucket;
///
/// let value = bucket("Alice\nFeatureX");
/// assert!((0.0..=100.0).contains(&value));
/// assert_eq!(value, bucket("Alice\nFeatureX"));
/// ```
pub fn bucket(key: &str) -> f64 {
    let digest = Sha256::digest(key.as_bytes());
    // 前4字节小端序解释为u32，跨实现兼容的关键：字节序与除数不可改动
    let marker = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (marker as f64 / u32::MAX as f64) * PERCENTILE_SCALE
}

/// 判断用户是否落在指定百分位区间内
///
/// 桶的键为 `"{user_id}\n{hint}"`。区间为 `[from, to)`，但 `to` 恰好为100
/// 时上界包含，保证覆盖桶值等于100的边界情况。
///
/// # 参数
/// - `user_id`: 用户ID（可为空字符串）
/// - `hint`: 去相关提示串（特性名、特性名+组名、或分配seed）
/// - `from`: 区间下界（0-100）
/// - `to`: 区间上界（0-100，不得小于from）
///
/// # 返回
/// - `Ok(true)`: 用户在区间内
/// - `Ok(false)`: 用户在区间外
/// - `Err(_)`: 区间参数非法
pub fn is_targeted_percentile(
    user_id: &str,
    hint: &str,
    from: f64,
    to: f64,
) -> Result<bool, FlagronError> {
    if !(0.0..=100.0).contains(&from) {
        return Err(FlagronError::ParameterError(
            "百分位下界'from'必须在0到100之间".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&to) {
        return Err(FlagronError::ParameterError(
            "百分位上界'to'必须在0到100之间".to_string(),
        ));
    }
    if from > to {
        return Err(FlagronError::ParameterError(
            "百分位下界'from'不能大于上界'to'".to_string(),
        ));
    }

    let context_percentage = bucket(&audience_context_id(user_id, hint));

    // to为100时上界包含
    if to == 100.0 {
        return Ok(context_percentage >= from);
    }

    Ok(context_percentage >= from && context_percentage < to)
}

/// 构造定向上下文ID（用户ID与hint以换行拼接）
fn audience_context_id(user_id: &str, hint: &str) -> String {
    format!("{}\n{}", user_id, hint)
}
