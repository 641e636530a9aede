//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务定义模型和服务解析的核心接口。
//!
//! ## 核心类型
//!
//! - [`ServiceDefinition`] - 从服务注册表解析出的服务定义
//! - [`ArgumentSpec`] / [`Arguments`] - 参数声明与已解析参数
//! - [`ClassDefinition`] - 类名到构造函数和方法表的映射
//! - [`ServiceResolver`] - 服务解析器接口

pub mod argument;
pub mod container;
pub mod definition;
pub mod factory;
pub mod resolver;

pub use argument::*;
pub use container::*;
pub use definition::*;
pub use factory::*;
pub use resolver::*;
