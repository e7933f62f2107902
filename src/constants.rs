//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 常量定义
//!
//! 集中管理引擎内部使用的常量。

/// 内置定向过滤器的注册名称
pub const TARGETING_FILTER_NAME: &str = "Flagron.Targeting";

/// 内置时间窗口过滤器的注册名称
pub const TIME_WINDOW_FILTER_NAME: &str = "Flagron.TimeWindow";

/// 变体分配百分位计算的默认hint前缀
///
/// 未配置seed时，百分位hint为 `"allocation\n" + 特性ID`，
/// 用于在不同特性之间去相关百分位分布。
pub const ALLOCATION_HINT_PREFIX: &str = "allocation";

/// 最大过滤器名称长度
pub const MAX_FILTER_NAME_LENGTH: usize = 100;

/// 百分位桶的上界（百分比）
pub const PERCENTILE_SCALE: f64 = 100.0;
