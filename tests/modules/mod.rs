//! 按模块组织的集成测试

pub mod custom_filters;
pub mod manager;
pub mod provider;
pub mod time_window;
