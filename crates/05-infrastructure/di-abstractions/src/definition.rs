//! 服务定义
//!
//! 服务注册表中每个条目的形式为：
//!
//! ```json
//! "model": {
//!     "class": "App.Model::setup",
//!     "_construct": { "0": "@pdo", "1": "#db.table" },
//!     "validate": { "rules": ["req", "max:10"] }
//! }
//! ```

use crate::argument::{ArgumentKey, ArgumentSpec};
use infrastructure_common::ContainerError;
use serde_json::Value;

/// 构造函数的伪方法名
pub const CONSTRUCTOR: &str = "_construct";

/// 服务条目中声明类的键
pub const CLASS_KEY: &str = "class";

/// 类声明，`Class` 或 `Class::method`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    /// 完整类名
    pub class_name: String,
    /// 类声明中显式指定的方法
    pub method: Option<String>,
}

impl ClassSpec {
    /// 按 `::` 拆分类声明
    ///
    /// 第一段为类名，第二段为方法名，其余各段被忽略
    pub fn parse(spec: &str) -> Self {
        let mut segments = spec.split("::");
        let class_name = segments.next().unwrap_or_default().to_string();
        let method = segments
            .next()
            .filter(|method| !method.is_empty())
            .map(str::to_string);
        Self { class_name, method }
    }

    /// 类的短名称（最后一个 `.` 或 `\` 之后的部分）
    pub fn simple_name(&self) -> &str {
        self.class_name
            .rsplit(|c: char| c == '.' || c == '\\')
            .next()
            .unwrap_or(&self.class_name)
    }

    /// 方法名是否为旧式的类名构造函数
    pub fn is_constructor_alias(&self, method: &str) -> bool {
        method == CONSTRUCTOR || method == self.simple_name()
    }
}

/// 声明的方法调用
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// 方法名
    pub method: String,
    /// 按声明顺序排列的参数
    pub arguments: Vec<(ArgumentKey, ArgumentSpec)>,
}

/// 服务定义
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    /// 服务标识
    pub id: String,
    /// 类声明
    pub class: ClassSpec,
    /// 按声明顺序排列的方法调用（不含 `class` 键）
    pub calls: Vec<MethodCall>,
}

impl ServiceDefinition {
    /// 从服务注册表条目解析服务定义
    pub fn from_value(id: &str, entry: &Value) -> Result<Self, ContainerError> {
        let Value::Object(map) = entry else {
            return Err(ContainerError::invalid_definition(id, "服务条目必须是对象"));
        };

        let class = match map.get(CLASS_KEY) {
            Some(Value::String(spec)) if !spec.trim().is_empty() => ClassSpec::parse(spec.trim()),
            _ => {
                return Err(ContainerError::ClassMissing {
                    service_id: id.to_string(),
                })
            }
        };

        if class.class_name.is_empty() {
            return Err(ContainerError::ClassMissing {
                service_id: id.to_string(),
            });
        }

        let calls = map
            .iter()
            .filter(|(key, _)| key.as_str() != CLASS_KEY)
            .map(|(method, arguments)| {
                Ok(MethodCall {
                    method: method.clone(),
                    arguments: parse_arguments(id, method, arguments)?,
                })
            })
            .collect::<Result<Vec<_>, ContainerError>>()?;

        Ok(Self {
            id: id.to_string(),
            class,
            calls,
        })
    }

    /// 定义中引用的其他服务
    pub fn service_references(&self) -> Vec<&str> {
        self.calls
            .iter()
            .flat_map(|call| call.arguments.iter())
            .filter_map(|(_, spec)| match spec {
                ArgumentSpec::ServiceRef(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn parse_arguments(
    id: &str,
    method: &str,
    arguments: &Value,
) -> Result<Vec<(ArgumentKey, ArgumentSpec)>, ContainerError> {
    match arguments {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(key, value)| (ArgumentKey::parse(key), ArgumentSpec::parse(value)))
            .collect()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(index, value)| (ArgumentKey::Index(index), ArgumentSpec::parse(value)))
            .collect()),
        // YAML 中没有参数的方法写作 `method:`
        Value::Null => Ok(Vec::new()),
        _ => Err(ContainerError::invalid_definition(
            id,
            format!("方法 {} 的参数必须是对象或数组", method),
        )),
    }
}
