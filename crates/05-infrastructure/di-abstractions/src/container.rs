//! 容器配置与统计

/// 默认最大解析深度
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 64;

/// 默认服务注册表配置节
pub const DEFAULT_SERVICES_KEY: &str = "services";

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 服务注册表所在的配置节
    pub services_key: String,
}

impl ContainerConfig {
    /// 设置最大解析深度
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    /// 设置服务注册表配置节
    pub fn with_services_key(mut self, key: impl Into<String>) -> Self {
        self.services_key = key.into();
        self
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            services_key: DEFAULT_SERVICES_KEY.to_string(),
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已声明的服务数量
    pub declared_services: usize,
    /// 已解析并缓存的服务数量
    pub resolved_services: usize,
    /// 解析错误数量
    pub resolution_errors: usize,
}
