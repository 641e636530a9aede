//! # Configuration Implementation
//!
//! 配置存储的具体实现，提供各种配置源和分层合并功能。
//!
//! ## 主要组件
//!
//! - [`LayeredConfigStore`] - 分层配置存储
//! - [`JsonConfigProvider`] - JSON 配置提供者
//! - [`YamlConfigProvider`] - YAML 配置提供者
//! - [`MemoryConfigProvider`] - 内存配置提供者
//! - [`EnvironmentConfigProvider`] - 环境变量配置提供者

pub mod discovery;
pub mod merge;
pub mod providers;
pub mod store;

pub use discovery::*;
pub use merge::*;
pub use providers::*;
pub use store::*;

#[cfg(test)]
mod tests;
