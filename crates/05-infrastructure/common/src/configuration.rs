//! 配置相关的基础类型定义

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 配置节
///
/// 保留配置文件中键的声明顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// 配置数据
    pub data: Map<String, Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new() -> Self {
        Self { data: Map::new() }
    }

    /// 插入配置项
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// 是否包含配置项
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// 配置项数量
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 配置节是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 按声明顺序返回所有键
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// 绑定到具体类型
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_json::from_value(Value::Object(self.data.clone()))
            .map_err(|e| ConfigError::SerializationError { source: e })
    }
}

impl From<Map<String, Value>> for ConfigSection {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct DatabaseOptions {
        host: String,
        port: u16,
    }

    #[test]
    fn test_section_preserves_declaration_order() {
        let mut section = ConfigSection::new();
        section.insert("zeta", json!(1));
        section.insert("alpha", json!(2));
        section.insert("mid", json!(3));

        let keys: Vec<&str> = section.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_section_bind() {
        let mut section = ConfigSection::new();
        section.insert("host", json!("localhost"));
        section.insert("port", json!(5432));

        let options: DatabaseOptions = section.bind().unwrap();
        assert_eq!(
            options,
            DatabaseOptions {
                host: "localhost".to_string(),
                port: 5432
            }
        );
    }

    #[test]
    fn test_section_bind_type_mismatch() {
        let mut section = ConfigSection::new();
        section.insert("host", json!(1));

        let result = section.bind::<DatabaseOptions>();
        assert!(matches!(result, Err(ConfigError::SerializationError { .. })));
    }
}
