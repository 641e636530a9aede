//! 服务参数模型
//!
//! 配置中的参数在解析服务定义时被转换为 [`ArgumentSpec`]，
//! 解析阶段再转换为可直接传给构造函数和方法的 [`Argument`]。

use infrastructure_common::InvocationError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 服务实例
///
/// 由容器缓存持有，调用方获得共享引用
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// 配置引用前缀
pub const CONFIG_REFERENCE_PREFIX: char = '#';

/// 服务引用前缀
pub const SERVICE_REFERENCE_PREFIX: char = '@';

/// 参数声明
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentSpec {
    /// 字面值，原样传递
    Literal(Value),
    /// `#dotted.key` 形式的配置引用
    ConfigRef(String),
    /// `@serviceId` 形式的服务引用
    ServiceRef(String),
}

impl ArgumentSpec {
    /// 从配置值解析参数声明
    ///
    /// 只有顶层字符串会检查引用前缀，数组和对象整体作为字面值
    pub fn parse(value: &Value) -> Self {
        match value {
            Value::String(s) => {
                if let Some(key) = s.strip_prefix(CONFIG_REFERENCE_PREFIX) {
                    ArgumentSpec::ConfigRef(key.to_string())
                } else if let Some(id) = s.strip_prefix(SERVICE_REFERENCE_PREFIX) {
                    ArgumentSpec::ServiceRef(id.to_string())
                } else {
                    ArgumentSpec::Literal(value.clone())
                }
            }
            other => ArgumentSpec::Literal(other.clone()),
        }
    }
}

/// 参数键：位置或名称
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentKey {
    /// 位置参数
    Index(usize),
    /// 命名参数
    Name(String),
}

impl ArgumentKey {
    /// 解析配置中的参数键，纯数字键视为位置
    pub fn parse(key: &str) -> Self {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = key.parse::<usize>() {
                return ArgumentKey::Index(index);
            }
        }
        ArgumentKey::Name(key.to_string())
    }
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKey::Index(index) => write!(f, "#{}", index),
            ArgumentKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ArgumentKey {
    fn from(index: usize) -> Self {
        ArgumentKey::Index(index)
    }
}

impl From<&str> for ArgumentKey {
    fn from(name: &str) -> Self {
        ArgumentKey::Name(name.to_string())
    }
}

/// 已解析的参数
#[derive(Clone)]
pub enum Argument {
    /// 字面值或配置值
    Value(Value),
    /// 已解析的服务实例
    Service {
        /// 服务标识
        id: String,
        /// 服务实例
        instance: ServiceInstance,
    },
}

impl Argument {
    /// 获取值
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Argument::Value(value) => Some(value),
            Argument::Service { .. } => None,
        }
    }

    /// 获取服务实例
    pub fn as_service(&self) -> Option<&ServiceInstance> {
        match self {
            Argument::Service { instance, .. } => Some(instance),
            Argument::Value(_) => None,
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Argument::Service { id, .. } => f
                .debug_struct("Service")
                .field("id", id)
                .field("instance", &"<service>")
                .finish(),
        }
    }
}

/// 有序参数集合
///
/// 保持配置中的声明顺序；构造函数和方法可以按名称或位置读取参数
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    entries: Vec<(ArgumentKey, Argument)>,
}

impl Arguments {
    /// 创建空参数集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入参数，已存在的键在原位置被替换
    pub fn insert(&mut self, key: ArgumentKey, argument: Argument) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = argument,
            None => self.entries.push((key, argument)),
        }
    }

    /// 以构建器方式插入参数
    pub fn with(mut self, key: impl Into<ArgumentKey>, argument: Argument) -> Self {
        self.insert(key.into(), argument);
        self
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按声明顺序遍历参数
    pub fn iter(&self) -> impl Iterator<Item = (&ArgumentKey, &Argument)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// 按键获取参数
    pub fn get(&self, key: &ArgumentKey) -> Option<&Argument> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 按声明顺序获取第 `n` 个参数
    pub fn nth(&self, n: usize) -> Option<&Argument> {
        self.entries.get(n).map(|(_, v)| v)
    }

    /// 先按名称、再按位置查找参数
    pub fn param(&self, position: usize, name: &str) -> Option<&Argument> {
        self.get(&ArgumentKey::Name(name.to_string()))
            .or_else(|| self.get(&ArgumentKey::Index(position)))
    }

    /// 查找必需参数
    pub fn required(&self, position: usize, name: &str) -> Result<&Argument, InvocationError> {
        self.param(position, name)
            .ok_or_else(|| InvocationError::MissingArgument {
                name: name.to_string(),
            })
    }

    /// 读取必需的值参数并反序列化
    pub fn value<T>(&self, position: usize, name: &str) -> Result<T, InvocationError>
    where
        T: DeserializeOwned,
    {
        match self.required(position, name)? {
            Argument::Value(value) => deserialize_value(name, value),
            Argument::Service { id, .. } => Err(InvocationError::invalid_argument(
                name,
                format!("期望值参数，实际为服务 @{}", id),
            )),
        }
    }

    /// 读取可选的值参数，缺失或为 null 时返回 `None`
    pub fn optional_value<T>(&self, position: usize, name: &str) -> Result<Option<T>, InvocationError>
    where
        T: DeserializeOwned,
    {
        match self.param(position, name) {
            None | Some(Argument::Value(Value::Null)) => Ok(None),
            Some(_) => self.value(position, name).map(Some),
        }
    }

    /// 读取必需的服务参数并转换为具体类型
    pub fn service<T>(&self, position: usize, name: &str) -> Result<Arc<T>, InvocationError>
    where
        T: Any + Send + Sync,
    {
        match self.required(position, name)? {
            Argument::Service { instance, .. } => {
                instance
                    .clone()
                    .downcast::<T>()
                    .map_err(|_| InvocationError::ServiceTypeMismatch {
                        name: name.to_string(),
                        expected: std::any::type_name::<T>(),
                    })
            }
            Argument::Value(_) => Err(InvocationError::invalid_argument(
                name,
                "期望服务引用 (@serviceId)",
            )),
        }
    }
}

fn deserialize_value<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, InvocationError> {
    serde_json::from_value(value.clone())
        .map_err(|e| InvocationError::invalid_argument(name, e.to_string()))
}
