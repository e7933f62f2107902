//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 特性开关数据源
//!
//! 数据源为评估器提供特性开关定义。本模块提供trait抽象与两个实现：
//! 内存数据源与本地文件数据源（JSON/YAML，按扩展名识别）。
//!
//! # 特性
//!
//! - 按名称查询与列举两类操作
//! - 文件数据源在构造时一次性加载并解析，评估路径不做IO
//! - 重复ID以后出现者为准（后写覆盖）

use crate::error::{FlagronError, ProviderError};
use crate::schema::{FeatureFlag, FeatureManagement};
use ahash::AHashMap;
use std::path::Path;
use tracing::{debug, info};

/// 特性开关数据源trait
///
/// 实现必须线程安全。评估器对每次查询调用`feature_flag`，
/// 实现应保证查询开销为常数级。
pub trait FeatureFlagProvider: Send + Sync {
    /// 按ID查询特性开关定义
    ///
    /// # 返回
    /// - `Ok(flag)`: 查询到的定义（克隆，调用方持有）
    /// - `Err(ProviderError::NotFound)`: 不存在该ID
    fn feature_flag(&self, name: &str) -> Result<FeatureFlag, ProviderError>;

    /// 列举所有特性开关ID（按文档声明顺序）
    fn feature_names(&self) -> Result<Vec<String>, ProviderError>;
}

// ============================================================================
// 内存数据源
// ============================================================================

/// 内存特性开关数据源
///
/// 从已解析的文档或定义列表构造，适合测试与内嵌配置场景。
///
/// # 示例
///
/// ```rust
/// use flagron::provider::{FeatureFlagProvider, InMemoryProvider};
/// use flagron::schema::FeatureFlag;
///
/// let provider = InMemoryProvider::from_flags(vec![FeatureFlag {
///     id: "Beta".to_string(),
///     enabled: true,
///     ..Default::default()
/// }]);
/// assert!(provider.feature_flag("Beta").is_ok());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    flags: AHashMap<String, FeatureFlag>,
    // 保留文档声明顺序
    order: Vec<String>,
}

impl InMemoryProvider {
    /// 从特性开关定义列表构造
    pub fn from_flags(flags: Vec<FeatureFlag>) -> Self {
        let mut map = AHashMap::with_capacity(flags.len());
        let mut order = Vec::with_capacity(flags.len());

        for flag in flags {
            if !map.contains_key(&flag.id) {
                order.push(flag.id.clone());
            }
            map.insert(flag.id.clone(), flag);
        }

        Self { flags: map, order }
    }

    /// 从特性开关文档构造
    pub fn from_document(document: FeatureManagement) -> Self {
        Self::from_flags(document.feature_flags)
    }

    /// 从JSON文本构造
    pub fn from_json(json: &str) -> Result<Self, FlagronError> {
        let document: FeatureManagement = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    /// 从YAML文本构造
    pub fn from_yaml(yaml: &str) -> Result<Self, FlagronError> {
        let document: FeatureManagement = serde_yaml::from_str(yaml)?;
        Ok(Self::from_document(document))
    }

    /// 数据源中的特性开关数量
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// 数据源是否为空
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FeatureFlagProvider for InMemoryProvider {
    fn feature_flag(&self, name: &str) -> Result<FeatureFlag, ProviderError> {
        self.flags
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    fn feature_names(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.order.clone())
    }
}

// ============================================================================
// 本地文件数据源
// ============================================================================

/// 本地文件特性开关数据源
///
/// 构造时按扩展名（`.json` / `.yaml` / `.yml`）解析文档并全部载入内存，
/// 之后的查询不再访问文件系统。文件变更不会被感知，需要重新构造。
#[derive(Debug)]
pub struct LocalFileProvider {
    inner: InMemoryProvider,
}

impl LocalFileProvider {
    /// 从本地文件加载特性开关文档
    ///
    /// # 参数
    /// - `path`: 文档路径，扩展名决定解析格式
    ///
    /// # 返回
    /// - `Err(FlagronError::IoError)`: 文件读取失败
    /// - `Err(FlagronError::SerdeError / YamlError)`: 文档解析失败
    /// - `Err(FlagronError::ValidationError)`: 不支持的扩展名
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlagronError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or("");

        let document: FeatureManagement = match extension {
            "json" => serde_json::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            other => {
                return Err(FlagronError::ValidationError(format!(
                    "不支持的特性开关文档格式: '{}'（支持json/yaml/yml）",
                    other
                )));
            }
        };

        info!(
            path = %path.display(),
            flags = document.feature_flags.len(),
            "feature flag document loaded"
        );
        debug!(path = %path.display(), "provider ready");

        Ok(Self {
            inner: InMemoryProvider::from_document(document),
        })
    }
}

impl FeatureFlagProvider for LocalFileProvider {
    fn feature_flag(&self, name: &str) -> Result<FeatureFlag, ProviderError> {
        self.inner.feature_flag(name)
    }

    fn feature_names(&self) -> Result<Vec<String>, ProviderError> {
        self.inner.feature_names()
    }
}
