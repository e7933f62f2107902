//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 错误类型定义
//!
//! 使用thiserror定义所有错误类型。

use thiserror::Error;

/// Flagron 错误类型
#[derive(Error, Debug)]
pub enum FlagronError {
    /// 特性开关定义校验错误
    #[error("特性开关定义无效: {0}")]
    ValidationError(String),

    /// 过滤器评估错误
    #[error("过滤器评估失败: {0}")]
    FilterError(String),

    /// 过滤器参数错误
    #[error("过滤器参数无效: {0}")]
    ParameterError(String),

    /// 定向上下文错误
    #[error("定向上下文错误: {0}")]
    ContextError(String),

    /// 注册表错误
    #[error("注册表错误: {0}")]
    RegistryError(String),

    /// 特性开关数据源错误（携带特性名称）
    #[error("特性开关 '{feature}' 数据源错误: {source}")]
    ProviderError {
        feature: String,
        #[source]
        source: ProviderError,
    },

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// YAML解析错误
    #[error("YAML解析错误: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl FlagronError {
    /// 包装数据源错误并附加特性名称
    pub fn provider(feature: impl Into<String>, source: ProviderError) -> Self {
        FlagronError::ProviderError {
            feature: feature.into(),
            source,
        }
    }
}

/// 特性开关数据源错误
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// 特性开关不存在
    #[error("特性开关不存在: {0}")]
    NotFound(String),

    /// 数据源不可用
    #[error("数据源不可用: {0}")]
    Unavailable(String),

    /// 文档解析错误
    #[error("文档解析错误: {0}")]
    ParseError(String),
}
