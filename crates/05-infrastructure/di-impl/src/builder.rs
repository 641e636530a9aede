//! 服务容器构建器

use crate::container::ServiceContainer;
use crate::registry::ClassRegistry;
use config_abstractions::ConfigStore;
use di_abstractions::{ClassDefinition, ContainerConfig};
use infrastructure_common::ContainerError;
use std::sync::Arc;

/// 服务容器构建器
#[derive(Default)]
pub struct ServiceContainerBuilder {
    store: Option<Arc<dyn ConfigStore>>,
    registry: ClassRegistry,
    config: ContainerConfig,
}

impl ServiceContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置配置存储
    pub fn with_store<S>(self, store: S) -> Self
    where
        S: ConfigStore + 'static,
    {
        self.with_shared_store(Arc::new(store))
    }

    /// 设置共享的配置存储，调用方可继续持有并重新加载
    pub fn with_shared_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 设置类注册表
    pub fn with_registry(mut self, registry: ClassRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// 注册单个类
    pub fn register_class(mut self, class: impl Into<ClassDefinition>) -> Self {
        self.registry.register(class);
        self
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 构建容器
    pub fn build(self) -> Result<ServiceContainer, ContainerError> {
        let store = self.store.ok_or(ContainerError::ConfigurationNotLoaded)?;
        Ok(ServiceContainer::new(store, self.registry, self.config))
    }
}
