//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {path}, 原因: {source}")]
    ParseError {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("不支持的配置文件格式: {path}")]
    UnsupportedFormat { path: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },

    #[error("配置重载失败: {message}")]
    ReloadError { message: String },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse_error(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ParseError {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 是否为键不存在错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}

/// 容器错误分类
///
/// 所有分类都只影响当前请求，不会导致进程退出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 配置未加载、服务未声明或服务定义不完整
    Configuration,
    /// 声明的方法或类无法解析为可调用对象
    Resolution,
    /// 实例创建或方法调用失败
    Instantiation,
    /// 服务在同一解析链中被重复请求
    CyclicDependency,
}

/// 服务容器错误类型
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("配置尚未加载，请先加载服务配置")]
    ConfigurationNotLoaded,

    #[error("配置中缺少 `{section}` 节，请在配置文件中声明服务")]
    ServicesSectionMissing { section: String },

    #[error("服务未声明: {service_id}")]
    ServiceNotDeclared { service_id: String },

    #[error("服务 {service_id} 未设置 class")]
    ClassMissing { service_id: String },

    #[error("服务定义无效: {service_id}, 原因: {message}")]
    InvalidDefinition { service_id: String, message: String },

    #[error("服务 {service_id} 引用的配置项不存在: {key}")]
    ConfigValueMissing {
        service_id: String,
        key: String,
        #[source]
        source: ConfigError,
    },

    #[error("无法将服务 {service_id} 解析为可调用对象: {class_name}::{method}")]
    UnresolvableMethod {
        service_id: String,
        class_name: String,
        method: String,
    },

    #[error("服务 {service_id} 的类未注册: {class_name}")]
    ClassNotRegistered {
        service_id: String,
        class_name: String,
    },

    #[error("服务实例创建失败: {service_id} ({class_name}), 原因: {message}")]
    InstantiationFailed {
        service_id: String,
        class_name: String,
        message: String,
    },

    #[error("服务方法调用失败: {service_id} ({class_name}::{method}), 原因: {message}")]
    MethodInvocationFailed {
        service_id: String,
        class_name: String,
        method: String,
        message: String,
    },

    #[error("检测到循环依赖: {chain}")]
    CyclicDependency { chain: String },

    #[error("超出最大解析深度 {max_depth}: {chain}")]
    ResolutionDepthExceeded { max_depth: usize, chain: String },

    #[error("服务 {service_id} 的实例类型不是 {expected}")]
    TypeMismatch {
        service_id: String,
        expected: &'static str,
    },
}

impl ContainerError {
    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationNotLoaded
            | Self::ServicesSectionMissing { .. }
            | Self::ServiceNotDeclared { .. }
            | Self::ClassMissing { .. }
            | Self::InvalidDefinition { .. }
            | Self::ConfigValueMissing { .. } => ErrorKind::Configuration,
            Self::UnresolvableMethod { .. }
            | Self::ClassNotRegistered { .. }
            | Self::TypeMismatch { .. } => ErrorKind::Resolution,
            Self::InstantiationFailed { .. } | Self::MethodInvocationFailed { .. } => {
                ErrorKind::Instantiation
            }
            Self::CyclicDependency { .. } | Self::ResolutionDepthExceeded { .. } => {
                ErrorKind::CyclicDependency
            }
        }
    }

    /// 创建服务定义无效错误
    pub fn invalid_definition(service_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            service_id: service_id.into(),
            message: message.into(),
        }
    }
}

/// 类构造函数或方法调用错误
///
/// 由注册到类注册表中的构造函数和方法返回
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("缺少参数: {name}")]
    MissingArgument { name: String },

    #[error("参数无效: {name}, 原因: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("参数 {name} 引用的服务类型不是 {expected}")]
    ServiceTypeMismatch { name: String, expected: &'static str },

    #[error("类 {class_name} 没有方法 {method}")]
    UnknownMethod { class_name: String, method: String },

    #[error("{message}")]
    Failed { message: String },
}

impl InvocationError {
    /// 创建通用调用失败错误
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// 创建参数无效错误
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ContainerError::ConfigurationNotLoaded.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ContainerError::UnresolvableMethod {
                service_id: "model".to_string(),
                class_name: "App.Model".to_string(),
                method: "missing".to_string(),
            }
            .kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            ContainerError::CyclicDependency {
                chain: "a -> b -> a".to_string()
            }
            .kind(),
            ErrorKind::CyclicDependency
        );
    }

    #[test]
    fn test_error_messages_name_the_service() {
        let error = ContainerError::ServiceNotDeclared {
            service_id: "mailer".to_string(),
        };
        assert!(error.to_string().contains("mailer"));

        let error = ContainerError::invalid_definition("model", "参数必须是对象或数组");
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert!(error.to_string().contains("model"));
    }

    #[test]
    fn test_config_error_not_found() {
        let error = ConfigError::KeyNotFound {
            key: "db.host".to_string(),
        };
        assert!(error.is_not_found());
        assert!(!ConfigError::ReloadError {
            message: "x".to_string()
        }
        .is_not_found());
    }
}
