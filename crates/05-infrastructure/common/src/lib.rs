//! # Infrastructure Common
//!
//! 这个 crate 提供了服务容器基础设施层的公共类型和工具。
//!
//! ## 核心组件
//!
//! - [`ConfigError`] - 配置错误类型
//! - [`ContainerError`] - 服务容器错误类型
//! - [`ConfigSection`] - 有序配置节
//! - [`init_tracing`] - 日志初始化

pub mod configuration;
pub mod errors;
pub mod logging;

pub use configuration::*;
pub use errors::*;
pub use logging::*;
