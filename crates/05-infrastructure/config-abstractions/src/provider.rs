//! 配置提供者抽象接口

use async_trait::async_trait;
use infrastructure_common::ConfigError;
use serde_json::Value;
use std::path::Path;

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置树的统一接口
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// 从数据源读取完整的配置树
    async fn load(&self) -> Result<Value, ConfigError>;

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级
    ///
    /// 合并时优先级高的提供者覆盖优先级低的提供者
    fn priority(&self) -> i32 {
        0
    }
}

/// 文件配置提供者 trait
#[async_trait]
pub trait FileConfigProvider: ConfigProvider {
    /// 获取文件路径
    fn file_path(&self) -> &Path;

    /// 获取文件格式
    fn format(&self) -> ConfigFormat;

    /// 检查文件是否存在
    async fn file_exists(&self) -> bool {
        tokio::fs::metadata(self.file_path()).await.is_ok()
    }
}

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// JSON 文件
    Json,
    /// YAML 文件
    Yaml,
}

impl ConfigFormat {
    /// 所有支持的格式
    pub const ALL: [ConfigFormat; 2] = [ConfigFormat::Json, ConfigFormat::Yaml];

    /// 根据文件扩展名识别格式
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    /// 格式对应的文件扩展名
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "json"),
            ConfigFormat::Yaml => write!(f, "yaml"),
        }
    }
}
