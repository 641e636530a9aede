//! # Configuration Abstractions
//!
//! 配置管理抽象层，定义配置源与配置存储的核心接口。
//!
//! ## 核心接口
//!
//! - [`ConfigProvider`] - 配置提供者接口
//! - [`ConfigStore`] - 配置存储接口
//! - [`path`] - 点分路径工具

pub mod path;
pub mod provider;
pub mod store;

pub use provider::*;
pub use store::*;
