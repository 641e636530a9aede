//! 服务解析器抽象接口
//!
//! 提供按服务标识解析实例的能力，以及解析过程中的循环依赖检测

use crate::argument::ServiceInstance;
use async_trait::async_trait;
use infrastructure_common::ContainerError;
use std::any::Any;
use std::sync::Arc;

/// 服务解析器 trait
///
/// 负责按服务标识返回完整装配的单例实例
#[async_trait]
pub trait ServiceResolver: Send + Sync {
    /// 解析指定标识的服务
    async fn service(&self, service_id: &str) -> Result<ServiceInstance, ContainerError>;

    /// 检查服务是否已声明
    async fn is_declared(&self, service_id: &str) -> bool;
}

/// 解析并转换为具体类型
pub async fn service_as<T, R>(resolver: &R, service_id: &str) -> Result<Arc<T>, ContainerError>
where
    T: Any + Send + Sync,
    R: ServiceResolver + ?Sized,
{
    resolver
        .service(service_id)
        .await?
        .downcast::<T>()
        .map_err(|_| ContainerError::TypeMismatch {
            service_id: service_id.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

/// 解析上下文
///
/// 记录当前正在构造的服务链，用于检测循环依赖和限制递归深度
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链
    pub resolution_chain: Vec<String>,
    /// 最大解析深度
    pub max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_chain: Vec::new(),
            max_depth,
        }
    }

    /// 是否处于解析链的顶层
    pub fn is_root(&self) -> bool {
        self.resolution_chain.is_empty()
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 服务是否正在构造中
    pub fn contains(&self, service_id: &str) -> bool {
        self.resolution_chain.iter().any(|id| id == service_id)
    }

    /// 将服务加入解析链
    pub fn enter(&mut self, service_id: &str) -> Result<(), ContainerError> {
        if self.contains(service_id) {
            return Err(ContainerError::CyclicDependency {
                chain: self.chain_with(service_id),
            });
        }

        if self.depth() >= self.max_depth {
            return Err(ContainerError::ResolutionDepthExceeded {
                max_depth: self.max_depth,
                chain: self.chain_with(service_id),
            });
        }

        self.resolution_chain.push(service_id.to_string());
        Ok(())
    }

    /// 从解析链中移除最后一个服务
    pub fn leave(&mut self) {
        self.resolution_chain.pop();
    }

    fn chain_with(&self, service_id: &str) -> String {
        self.resolution_chain
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(service_id))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(crate::container::DEFAULT_MAX_RESOLUTION_DEPTH)
    }
}
