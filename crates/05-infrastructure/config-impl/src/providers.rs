//! 配置提供者实现

use async_trait::async_trait;
use config_abstractions::{ConfigFormat, ConfigProvider, FileConfigProvider};
use infrastructure_common::ConfigError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 文件提供者默认优先级
const FILE_PRIORITY: i32 = 100;

/// 读取配置文件内容
async fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::FileReadError { source: e }
        }
    })
}

/// JSON 配置提供者
#[derive(Debug)]
pub struct JsonConfigProvider {
    file_path: PathBuf,
    priority: i32,
}

impl JsonConfigProvider {
    /// 创建新的 JSON 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            priority: FILE_PRIORITY,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[async_trait]
impl ConfigProvider for JsonConfigProvider {
    async fn load(&self) -> Result<Value, ConfigError> {
        debug!("加载 JSON 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path).await?;
        let value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::parse_error(self.file_path.display().to_string(), e))?;

        debug!("JSON 配置文件加载完成");
        Ok(value)
    }

    fn name(&self) -> &str {
        "JsonConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for JsonConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }
}

/// YAML 配置提供者
#[derive(Debug)]
pub struct YamlConfigProvider {
    file_path: PathBuf,
    priority: i32,
}

impl YamlConfigProvider {
    /// 创建新的 YAML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            priority: FILE_PRIORITY,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[async_trait]
impl ConfigProvider for YamlConfigProvider {
    async fn load(&self) -> Result<Value, ConfigError> {
        debug!("加载 YAML 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path).await?;
        // 空文件视为空配置
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        let value = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::parse_error(self.file_path.display().to_string(), e))?;

        debug!("YAML 配置文件加载完成");
        Ok(value)
    }

    fn name(&self) -> &str {
        "YamlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for YamlConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Yaml
    }
}

/// 根据文件扩展名创建文件配置提供者
pub fn file_provider(path: &Path) -> Result<Box<dyn ConfigProvider>, ConfigError> {
    match ConfigFormat::from_path(path) {
        Some(ConfigFormat::Json) => Ok(Box::new(JsonConfigProvider::new(path))),
        Some(ConfigFormat::Yaml) => Ok(Box::new(YamlConfigProvider::new(path))),
        None => Err(ConfigError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// 内存配置提供者
///
/// 直接持有一棵配置树，主要用于测试和程序内默认值
#[derive(Debug, Clone)]
pub struct MemoryConfigProvider {
    name: String,
    config: Value,
    priority: i32,
}

impl MemoryConfigProvider {
    /// 创建新的内存配置提供者
    pub fn new(config: Value) -> Self {
        Self {
            name: "MemoryConfigProvider".to_string(),
            config,
            priority: FILE_PRIORITY,
        }
    }

    /// 设置名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn load(&self) -> Result<Value, ConfigError> {
        Ok(self.config.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 环境变量配置提供者
///
/// `APP__DB__HOST=localhost` 在前缀为 `APP` 时映射为 `db.host`
#[derive(Debug)]
pub struct EnvironmentConfigProvider {
    prefix: String,
    separator: String,
    priority: i32,
}

impl EnvironmentConfigProvider {
    /// 创建新的环境变量配置提供者
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: "__".to_string(),
            priority: 200, // 环境变量最高优先级
        }
    }

    /// 设置分隔符
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 获取环境变量前缀
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 将环境变量键转换为配置路径段
    fn env_key_to_segments(&self, env_key: &str) -> Option<Vec<String>> {
        let rest = env_key.strip_prefix(&self.prefix)?;
        let rest = rest.strip_prefix(&self.separator)?;
        if rest.is_empty() {
            return None;
        }

        Some(
            rest.split(self.separator.as_str())
                .map(str::to_lowercase)
                .collect(),
        )
    }

    /// 从键值对构建配置树
    pub fn build_tree<I>(&self, vars: I) -> Value
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut root = Map::new();

        for (key, value) in vars {
            let Some(segments) = self.env_key_to_segments(&key) else {
                continue;
            };
            insert_path(&mut root, &segments, parse_scalar(&value));
        }

        Value::Object(root)
    }
}

#[async_trait]
impl ConfigProvider for EnvironmentConfigProvider {
    async fn load(&self) -> Result<Value, ConfigError> {
        debug!("加载环境变量，前缀: {}", self.prefix);
        let tree = self.build_tree(std::env::vars());
        debug!(
            "加载了 {} 个顶层环境变量配置",
            tree.as_object().map_or(0, Map::len)
        );
        Ok(tree)
    }

    fn name(&self) -> &str {
        "EnvironmentConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 尝试把字符串解析为布尔、整数或浮点数
fn parse_scalar(value: &str) -> Value {
    if let Ok(bool_val) = value.parse::<bool>() {
        Value::Bool(bool_val)
    } else if let Ok(int_val) = value.parse::<i64>() {
        Value::Number(int_val.into())
    } else if let Some(number) = value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
    {
        Value::Number(number)
    } else {
        Value::String(value.to_string())
    }
}

fn insert_path(root: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }

    current.insert(last.clone(), value);
}
