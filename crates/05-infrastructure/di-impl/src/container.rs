//! 服务容器
//!
//! 按需读取服务注册表，解析参数并构造服务；每个服务标识只构造一次，
//! 之后的请求返回缓存中的同一实例。

use crate::planner::{is_callable, normalize_method, MethodPlan};
use crate::registry::ClassRegistry;
use async_trait::async_trait;
use config_abstractions::ConfigStore;
use di_abstractions::{
    Argument, ArgumentSpec, Arguments, ContainerConfig, ContainerStats, ResolveContext,
    ServiceDefinition, ServiceInstance, ServiceResolver,
};
use futures::future::{BoxFuture, FutureExt};
use infrastructure_common::ContainerError;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

/// 服务容器
pub struct ServiceContainer {
    /// 配置存储
    store: Arc<dyn ConfigStore>,
    /// 类注册表
    registry: ClassRegistry,
    /// 容器配置
    config: ContainerConfig,
    /// 已构造的服务实例
    instances: RwLock<HashMap<String, ServiceInstance>>,
    /// 构造锁，解析链的顶层持有
    construction_lock: Mutex<()>,
    /// 解析错误计数
    resolution_errors: AtomicUsize,
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServiceContainer {
    /// 创建服务容器
    pub fn new(
        store: Arc<dyn ConfigStore>,
        registry: ClassRegistry,
        config: ContainerConfig,
    ) -> Self {
        info!(
            "创建服务容器: {} 个已注册类, 服务配置节 `{}`",
            registry.len(),
            config.services_key
        );

        Self {
            store,
            registry,
            config,
            instances: RwLock::new(HashMap::new()),
            construction_lock: Mutex::new(()),
            resolution_errors: AtomicUsize::new(0),
        }
    }

    /// 获取服务实例
    ///
    /// 首次请求时构造服务并缓存，之后返回同一实例。失败不会被缓存，
    /// 下一次请求会重新尝试。
    pub async fn service(&self, service_id: &str) -> Result<ServiceInstance, ContainerError> {
        let mut context = ResolveContext::new(self.config.max_resolution_depth);

        self.resolve(service_id, &mut context).await.map_err(|e| {
            self.resolution_errors.fetch_add(1, Ordering::Relaxed);
            error!("服务解析失败: {}, 原因: {}", service_id, e);
            e
        })
    }

    /// 获取服务实例并转换为具体类型
    pub async fn service_as<T>(&self, service_id: &str) -> Result<Arc<T>, ContainerError>
    where
        T: Any + Send + Sync,
    {
        di_abstractions::service_as::<T, _>(self, service_id)
            .await
            .map_err(|e| {
                if matches!(e, ContainerError::TypeMismatch { .. }) {
                    self.resolution_errors.fetch_add(1, Ordering::Relaxed);
                    error!("{}", e);
                }
                e
            })
    }

    /// 服务是否已构造
    pub async fn is_resolved(&self, service_id: &str) -> bool {
        self.instances.read().await.contains_key(service_id)
    }

    /// 已构造的服务标识（排序后）
    pub async fn resolved_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.instances.read().await.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// 服务注册表中声明的服务标识，保持声明顺序
    pub async fn declared_services(&self) -> Vec<String> {
        match self.store.get_section(&self.config.services_key).await {
            Ok(section) => section.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// 获取容器统计信息
    pub async fn stats(&self) -> ContainerStats {
        ContainerStats {
            declared_services: self.declared_services().await.len(),
            resolved_services: self.instances.read().await.len(),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
        }
    }

    /// 获取配置存储
    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    /// 获取类注册表
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// 获取容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn resolve<'a>(
        &'a self,
        service_id: &'a str,
        context: &'a mut ResolveContext,
    ) -> BoxFuture<'a, Result<ServiceInstance, ContainerError>> {
        async move {
            let definition = self.definition(service_id).await?;

            if let Some(instance) = self.cached(service_id).await {
                debug!("返回缓存的服务: {}", service_id);
                return Ok(instance);
            }

            if !context.is_root() {
                return self.construct_and_cache(&definition, context).await;
            }

            let _guard = self.construction_lock.lock().await;
            if let Some(instance) = self.cached(service_id).await {
                debug!("服务已由其他任务构造: {}", service_id);
                return Ok(instance);
            }

            self.construct_and_cache(&definition, context).await
        }
        .boxed()
    }

    async fn cached(&self, service_id: &str) -> Option<ServiceInstance> {
        self.instances.read().await.get(service_id).cloned()
    }

    /// 从服务注册表读取服务定义
    async fn definition(&self, service_id: &str) -> Result<ServiceDefinition, ContainerError> {
        if !self.store.is_loaded().await {
            return Err(ContainerError::ConfigurationNotLoaded);
        }

        let section = self
            .store
            .get_section(&self.config.services_key)
            .await
            .map_err(|_| ContainerError::ServicesSectionMissing {
                section: self.config.services_key.clone(),
            })?;

        let entry = section
            .get(service_id)
            .ok_or_else(|| ContainerError::ServiceNotDeclared {
                service_id: service_id.to_string(),
            })?;

        ServiceDefinition::from_value(service_id, entry)
    }

    async fn construct_and_cache(
        &self,
        definition: &ServiceDefinition,
        context: &mut ResolveContext,
    ) -> Result<ServiceInstance, ContainerError> {
        context.enter(&definition.id)?;
        let dependencies = definition.service_references();
        if !dependencies.is_empty() {
            debug!("服务 {} 依赖: {}", definition.id, dependencies.join(", "));
        }
        let result = self.construct(definition, context).await;
        context.leave();

        let instance = result?;
        self.instances
            .write()
            .await
            .insert(definition.id.clone(), instance.clone());

        info!(
            "服务已创建: {} ({})",
            definition.id, definition.class.class_name
        );
        Ok(instance)
    }

    async fn construct(
        &self,
        definition: &ServiceDefinition,
        context: &mut ResolveContext,
    ) -> Result<ServiceInstance, ContainerError> {
        let class_name = &definition.class.class_name;
        let mut plan = self.plan_methods(definition, context).await?;

        let class = self
            .registry
            .get(class_name)
            .ok_or_else(|| ContainerError::ClassNotRegistered {
                service_id: definition.id.clone(),
                class_name: class_name.clone(),
            })?;

        debug!("构造服务: {} ({})", definition.id, class_name);
        let mut object = class
            .instantiate(&plan.take_constructor())
            .map_err(|e| ContainerError::InstantiationFailed {
                service_id: definition.id.clone(),
                class_name: class_name.clone(),
                message: e.to_string(),
            })?;

        for (method, arguments) in plan.into_calls() {
            debug!("调用方法: {}::{} ({})", class_name, method, definition.id);
            class
                .invoke(object.as_mut(), &method, &arguments)
                .map_err(|e| ContainerError::MethodInvocationFailed {
                    service_id: definition.id.clone(),
                    class_name: class_name.clone(),
                    method: method.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(Arc::from(object))
    }

    /// 生成方法调用计划并解析全部参数
    async fn plan_methods(
        &self,
        definition: &ServiceDefinition,
        context: &mut ResolveContext,
    ) -> Result<MethodPlan, ContainerError> {
        let class = &definition.class;
        let mut plan = MethodPlan::new();

        if let Some(method) = &class.method {
            self.ensure_callable(definition, method)?;
            plan.seed(normalize_method(class, method));
        }

        for call in &definition.calls {
            self.ensure_callable(definition, &call.method)?;

            let mut arguments = Arguments::new();
            for (key, spec) in &call.arguments {
                let argument = self.build_argument(&definition.id, spec, context).await?;
                arguments.insert(key.clone(), argument);
            }

            plan.set(normalize_method(class, &call.method), arguments);
        }

        Ok(plan)
    }

    fn ensure_callable(
        &self,
        definition: &ServiceDefinition,
        method: &str,
    ) -> Result<(), ContainerError> {
        if is_callable(&self.registry, &definition.class, method) {
            Ok(())
        } else {
            Err(ContainerError::UnresolvableMethod {
                service_id: definition.id.clone(),
                class_name: definition.class.class_name.clone(),
                method: method.to_string(),
            })
        }
    }

    /// 将参数声明解析为实际参数
    async fn build_argument(
        &self,
        service_id: &str,
        spec: &ArgumentSpec,
        context: &mut ResolveContext,
    ) -> Result<Argument, ContainerError> {
        match spec {
            ArgumentSpec::Literal(value) => Ok(Argument::Value(value.clone())),
            ArgumentSpec::ConfigRef(key) => self
                .store
                .get_configuration(key)
                .await
                .map(Argument::Value)
                .map_err(|source| ContainerError::ConfigValueMissing {
                    service_id: service_id.to_string(),
                    key: key.clone(),
                    source,
                }),
            ArgumentSpec::ServiceRef(id) => {
                let instance = self.resolve(id, context).await?;
                Ok(Argument::Service {
                    id: id.clone(),
                    instance,
                })
            }
        }
    }
}

#[async_trait]
impl ServiceResolver for ServiceContainer {
    async fn service(&self, service_id: &str) -> Result<ServiceInstance, ContainerError> {
        ServiceContainer::service(self, service_id).await
    }

    async fn is_declared(&self, service_id: &str) -> bool {
        match self.store.get_section(&self.config.services_key).await {
            Ok(section) => section.contains_key(service_id),
            Err(_) => false,
        }
    }
}
