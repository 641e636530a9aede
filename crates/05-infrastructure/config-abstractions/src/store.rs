//! 配置存储抽象接口

use crate::provider::ConfigProvider;
use async_trait::async_trait;
use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::path::Path;

/// 配置存储 trait
///
/// 将多个配置源合并为一棵配置树，并提供点分路径访问
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 从文件或目录加载配置，返回合并后的配置树
    ///
    /// 重复加载同一路径时替换之前由它加载的文件层
    async fn load(&self, path: &Path) -> Result<Value, ConfigError>;

    /// 注册配置提供者并重新合并配置树
    async fn register_provider(&self, provider: Box<dyn ConfigProvider>) -> Result<(), ConfigError>;

    /// 获取配置值
    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 获取配置节
    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError>;

    /// 检查配置键是否存在
    async fn contains_key(&self, key: &str) -> bool;

    /// 获取所有配置键
    async fn get_all_keys(&self) -> Vec<String>;

    /// 配置树是否已加载且非空
    async fn is_loaded(&self) -> bool;

    /// 重新从所有提供者加载配置
    async fn reload_all(&self) -> Result<(), ConfigError>;
}
