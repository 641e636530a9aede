//! 分层配置存储实现

use crate::discovery::discover_config_files;
use crate::merge::deep_merge;
use crate::providers::file_provider;
use async_trait::async_trait;
use config_abstractions::{path, ConfigProvider, ConfigStore};
use infrastructure_common::{ConfigError, ConfigSection};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// 已注册的配置层
struct ConfigLayer {
    provider: Box<dyn ConfigProvider>,
    tree: Value,
    /// 文件层的规范化路径，程序注册的提供者为 `None`
    source: Option<PathBuf>,
}

/// 一次 `load` 调用所拥有的文件层范围
enum LoadScope {
    /// 单个配置文件
    File(PathBuf),
    /// 配置目录下的全部文件
    Directory(PathBuf),
}

impl LoadScope {
    fn owns(&self, layer: &ConfigLayer) -> bool {
        match (self, layer.source.as_deref()) {
            (LoadScope::File(file), Some(source)) => source == file,
            (LoadScope::Directory(dir), Some(source)) => source.parent() == Some(dir.as_path()),
            (_, None) => false,
        }
    }
}

/// 分层配置存储
///
/// 按优先级从低到高合并所有提供者的配置树；优先级相同时后注册的覆盖先注册的
pub struct LayeredConfigStore {
    /// 配置层（按优先级升序）
    layers: RwLock<Vec<ConfigLayer>>,
    /// 合并后的配置树
    tree: RwLock<Value>,
}

impl std::fmt::Debug for LayeredConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layers_count = self.layers.try_read().map(|layers| layers.len()).ok();
        f.debug_struct("LayeredConfigStore")
            .field("layers_count", &layers_count)
            .finish()
    }
}

impl LayeredConfigStore {
    /// 创建空的配置存储
    pub fn new() -> Self {
        Self {
            layers: RwLock::new(Vec::new()),
            tree: RwLock::new(Value::Object(Map::new())),
        }
    }

    /// 从文件或目录创建配置存储
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let store = Self::new();
        store.load(path.as_ref()).await?;
        Ok(store)
    }

    /// 获取配置层数量
    pub async fn provider_count(&self) -> usize {
        self.layers.read().await.len()
    }

    /// 获取合并后配置树的快照
    pub async fn snapshot(&self) -> Value {
        self.tree.read().await.clone()
    }

    /// 绑定配置到指定类型
    pub async fn bind_configuration<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!("绑定配置到类型: {} -> {}", key, std::any::type_name::<T>());
        let value = self.get_configuration(key).await?;
        serde_json::from_value(value).map_err(|e| ConfigError::TypeConversionError {
            message: format!("{} -> {}: {}", key, std::any::type_name::<T>(), e),
        })
    }

    /// 插入配置层并重建配置树
    async fn push_layer(&self, provider: Box<dyn ConfigProvider>) -> Result<(), ConfigError> {
        let tree = provider.load().await?;
        info!("注册配置提供者: {} (优先级 {})", provider.name(), provider.priority());

        let mut layers = self.layers.write().await;
        layers.push(ConfigLayer {
            provider,
            tree,
            source: None,
        });
        // 稳定排序，相同优先级保持注册顺序
        layers.sort_by_key(|layer| layer.provider.priority());

        self.rebuild(&layers).await;
        Ok(())
    }

    /// 用新读取的文件层替换该范围内已有的文件层
    ///
    /// 所有文件都读取成功后才修改配置层；新层放在被替换的第一层的位置
    async fn replace_file_layers(
        &self,
        scope: LoadScope,
        files: Vec<PathBuf>,
    ) -> Result<(), ConfigError> {
        let mut loaded = Vec::with_capacity(files.len());
        for file in files {
            let source = tokio::fs::canonicalize(&file).await?;
            let provider = file_provider(&file)?;
            let tree = provider.load().await?;
            loaded.push(ConfigLayer {
                provider,
                tree,
                source: Some(source),
            });
        }

        let mut layers = self.layers.write().await;
        let position = layers
            .iter()
            .position(|layer| scope.owns(layer))
            .unwrap_or(layers.len());
        let before = layers.len();
        layers.retain(|layer| !scope.owns(layer));
        if before > layers.len() {
            debug!("替换 {} 个已加载的文件配置层", before - layers.len());
        }

        for layer in &loaded {
            info!(
                "注册配置提供者: {} (优先级 {})",
                layer.provider.name(),
                layer.provider.priority()
            );
        }
        layers.splice(position..position, loaded);
        layers.sort_by_key(|layer| layer.provider.priority());

        self.rebuild(&layers).await;
        Ok(())
    }

    async fn rebuild(&self, layers: &[ConfigLayer]) {
        let mut merged = Value::Object(Map::new());
        for layer in layers {
            deep_merge(&mut merged, layer.tree.clone());
        }

        *self.tree.write().await = merged;
        debug!("配置树已重建，共 {} 层", layers.len());
    }
}

impl Default for LayeredConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for LayeredConfigStore {
    async fn load(&self, path: &Path) -> Result<Value, ConfigError> {
        info!("加载配置: {}", path.display());

        if path.is_dir() {
            let files = discover_config_files(path)?;
            if files.is_empty() {
                warn!("配置目录中没有可用的配置文件: {}", path.display());
            }
            let scope = LoadScope::Directory(tokio::fs::canonicalize(path).await?);
            self.replace_file_layers(scope, files).await?;
        } else if path.is_file() {
            let scope = LoadScope::File(tokio::fs::canonicalize(path).await?);
            self.replace_file_layers(scope, vec![path.to_path_buf()]).await?;
        } else {
            error!("配置路径不存在: {}", path.display());
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        Ok(self.snapshot().await)
    }

    async fn register_provider(&self, provider: Box<dyn ConfigProvider>) -> Result<(), ConfigError> {
        self.push_layer(provider).await
    }

    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        debug!("获取配置: {}", key);

        let tree = self.tree.read().await;
        path::lookup(&tree, key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        debug!("获取配置节: {}", section_name);

        let tree = self.tree.read().await;
        match path::lookup(&tree, section_name) {
            Some(Value::Object(map)) => Ok(ConfigSection::from(map.clone())),
            Some(_) => Err(ConfigError::TypeConversionError {
                message: format!("配置节 {} 不是对象类型", section_name),
            }),
            None => Err(ConfigError::KeyNotFound {
                key: section_name.to_string(),
            }),
        }
    }

    async fn contains_key(&self, key: &str) -> bool {
        let tree = self.tree.read().await;
        path::lookup(&tree, key).is_some()
    }

    async fn get_all_keys(&self) -> Vec<String> {
        path::collect_keys(&*self.tree.read().await)
    }

    async fn is_loaded(&self) -> bool {
        match &*self.tree.read().await {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        }
    }

    async fn reload_all(&self) -> Result<(), ConfigError> {
        info!("重新加载所有配置");

        let mut layers = self.layers.write().await;
        let mut errors = Vec::new();

        for layer in layers.iter_mut() {
            match layer.provider.load().await {
                Ok(tree) => layer.tree = tree,
                Err(e) => {
                    error!("提供者 {} 重载失败: {}", layer.provider.name(), e);
                    errors.push(e);
                }
            }
        }

        self.rebuild(&layers).await;

        if errors.is_empty() {
            info!("所有配置提供者重载成功");
            Ok(())
        } else {
            Err(ConfigError::ReloadError {
                message: format!("{}个提供者重载失败", errors.len()),
            })
        }
    }
}
