//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 时间窗口过滤器
//!
//! 内置的时间窗口过滤器，根据当前时间与可选的 [start, end) 区间决定启用。
//! 与定向上下文无关。时间串按多种文本格式依次尝试解析（RFC 3339、
//! RFC 2822、HTTP-date 等），全部失败才报错。

use crate::audience::TargetingContext;
use crate::constants::TIME_WINDOW_FILTER_NAME;
use crate::error::FlagronError;
use crate::filters::{FeatureFilter, FilterEvaluationContext};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// 时间窗口过滤器参数
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TimeWindowFilterParameters {
    /// 窗口起点（含）
    #[serde(default, alias = "Start")]
    pub start: Option<String>,
    /// 窗口终点（不含）
    #[serde(default, alias = "End")]
    pub end: Option<String>,
}

/// 无时区的后备解析格式，按UTC解释
const NAIVE_FORMATS: &[&str] = &[
    // HTTP-date（RFC 1123，GMT固定后缀）
    "%a, %d %b %Y %H:%M:%S GMT",
    "%Y-%m-%d %H:%M:%S",
];

/// 解析时间串
///
/// 依次尝试 RFC 3339、RFC 2822 以及若干无时区格式（按UTC解释），
/// 任一格式成功即返回，全部失败返回参数错误。
pub fn parse_time(value: &str) -> Result<DateTime<Utc>, FlagronError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }

    Err(FlagronError::ParameterError(format!(
        "无法用任何已知格式解析时间: '{}'",
        value
    )))
}

/// 内置时间窗口过滤器
#[derive(Debug, Default)]
pub struct TimeWindowFilter;

impl TimeWindowFilter {
    /// 创建时间窗口过滤器
    pub fn new() -> Self {
        Self
    }

    /// 在指定时刻评估窗口，便于测试
    fn evaluate_at(
        &self,
        eval_ctx: &FilterEvaluationContext<'_>,
        now: DateTime<Utc>,
    ) -> Result<bool, FlagronError> {
        let params: TimeWindowFilterParameters =
            serde_json::from_value(Value::Object(eval_ctx.parameters.clone())).map_err(|e| {
                FlagronError::ParameterError(format!(
                    "特性 '{}' 的时间窗口参数格式无效: {}",
                    eval_ctx.feature_name, e
                ))
            })?;

        let start = params
            .start
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| {
                parse_time(value).map_err(|e| {
                    FlagronError::ParameterError(format!(
                        "特性 '{}' 的起始时间无效: {}",
                        eval_ctx.feature_name, e
                    ))
                })
            })
            .transpose()?;

        let end = params
            .end
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| {
                parse_time(value).map_err(|e| {
                    FlagronError::ParameterError(format!(
                        "特性 '{}' 的结束时间无效: {}",
                        eval_ctx.feature_name, e
                    ))
                })
            })
            .transpose()?;

        // 两端都未配置时该过滤器无效：按未启用处理并告警，不报错
        if start.is_none() && end.is_none() {
            warn!(
                feature = eval_ctx.feature_name,
                "时间窗口过滤器无效：必须至少配置'start'或'end'之一"
            );
            return Ok(false);
        }

        let after_start = start.map_or(true, |start| now >= start);
        let before_end = end.map_or(true, |end| now < end);

        Ok(after_start && before_end)
    }
}

impl FeatureFilter for TimeWindowFilter {
    fn name(&self) -> &str {
        TIME_WINDOW_FILTER_NAME
    }

    fn evaluate(
        &self,
        eval_ctx: &FilterEvaluationContext<'_>,
        _app_ctx: Option<&TargetingContext>,
    ) -> Result<bool, FlagronError> {
        self.evaluate_at(eval_ctx, Utc::now())
    }
}
