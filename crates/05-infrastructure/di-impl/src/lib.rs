//! # 依赖注入具体实现
//!
//! 提供基于配置的服务容器、类注册表和容器构建器
//!
//! ```ignore
//! let container = ServiceContainerBuilder::new()
//!     .with_store(LayeredConfigStore::from_path("config").await?)
//!     .register_class(ClassDefinition::builder("App.Pdo", Pdo::construct))
//!     .build()?;
//!
//! let pdo = container.service_as::<Pdo>("pdo").await?;
//! ```

pub mod builder;
pub mod container;
pub mod planner;
pub mod registry;

pub use builder::*;
pub use container::*;
pub use planner::*;
pub use registry::*;

#[cfg(test)]
mod tests;
