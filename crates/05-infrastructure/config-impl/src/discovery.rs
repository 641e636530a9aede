//! 配置文件发现

use config_abstractions::ConfigFormat;
use infrastructure_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 列出目录下所有受支持的配置文件（不递归）
///
/// 结果按文件名排序，合并时排在后面的文件覆盖前面的文件
pub fn discover_config_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !dir.is_dir() {
        return Err(ConfigError::FileNotFound {
            path: dir.display().to_string(),
        });
    }

    let escaped = glob::Pattern::escape(&dir.display().to_string());
    let mut files = Vec::new();

    for format in ConfigFormat::ALL {
        for extension in format.extensions() {
            let pattern = format!("{}/*.{}", escaped, extension);
            let entries = glob::glob(&pattern).map_err(|e| ConfigError::parse_error(&pattern, e))?;

            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => warn!("无法读取配置文件路径: {}", e),
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files.dedup();

    debug!("在 {} 中发现 {} 个配置文件", dir.display(), files.len());
    Ok(files)
}
