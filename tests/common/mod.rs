//! 测试通用工具模块
//!
//! 提供测试中常用的工具函数和辅助结构。

use flagron::manager::FeatureManager;
use flagron::provider::InMemoryProvider;
use std::sync::Arc;
use std::sync::Once;

static TRACING: Once = Once::new();

/// 初始化测试日志（多次调用安全）
///
/// 通过 `RUST_LOG=flagron=trace cargo test` 查看评估过程日志。
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// 从JSON文档构造测试用的FeatureManager
pub fn manager_from_json(json: &str) -> FeatureManager {
    init_tracing();
    let provider = InMemoryProvider::from_json(json).expect("test document should parse");
    FeatureManager::new(Arc::new(provider)).expect("manager should build")
}
