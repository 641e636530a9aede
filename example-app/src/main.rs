//! # 示例应用程序
//!
//! 从配置目录加载服务注册表，按名称解析服务并输出结果
//!
//! ```text
//! example-app --config example-app/config model validator
//! ```

mod classes;

use anyhow::Context;
use clap::Parser;
use config_abstractions::ConfigStore;
use config_impl::{EnvironmentConfigProvider, LayeredConfigStore};
use di_abstractions::ContainerConfig;
use di_impl::{ServiceContainer, ServiceContainerBuilder};
use infrastructure_common::init_tracing;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "基于配置的服务容器示例")]
struct Args {
    /// 配置文件或配置目录
    #[arg(short, long, default_value = "config")]
    config: PathBuf,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 环境变量前缀，例如 `APP` 会把 `APP__DB__DSN` 映射为 `db.dsn`
    #[arg(long)]
    env_prefix: Option<String>,

    /// 服务注册表所在的配置节
    #[arg(long, default_value = "services")]
    services_key: String,

    /// 只列出声明的服务
    #[arg(long)]
    list: bool,

    /// 要解析的服务标识，未指定时解析全部服务
    service_ids: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    info!("启动服务容器示例");

    let container = build_container(&args).await?;
    let declared = container.declared_services().await;

    if args.list {
        for id in &declared {
            println!("{}", id);
        }
        return Ok(());
    }

    let ids = if args.service_ids.is_empty() {
        declared
    } else {
        args.service_ids.clone()
    };

    let mut failures = 0;
    for id in &ids {
        match container.service(id).await {
            Ok(instance) => println!("{} => {}", id, classes::describe(&instance)),
            Err(e) => {
                failures += 1;
                eprintln!("{} => 错误 [{:?}]: {}", id, e.kind(), e);
            }
        }
    }

    let stats = container.stats().await;
    info!(
        "声明 {} 个服务，已解析 {} 个，失败 {} 次",
        stats.declared_services, stats.resolved_services, stats.resolution_errors
    );

    if failures > 0 {
        error!("{} 个服务解析失败", failures);
        anyhow::bail!("{} 个服务解析失败", failures);
    }

    Ok(())
}

/// 加载配置并构建容器
async fn build_container(args: &Args) -> anyhow::Result<ServiceContainer> {
    let store = Arc::new(
        LayeredConfigStore::from_path(&args.config)
            .await
            .with_context(|| format!("无法加载配置: {}", args.config.display()))?,
    );

    if let Some(prefix) = &args.env_prefix {
        store
            .register_provider(Box::new(EnvironmentConfigProvider::new(prefix.clone())))
            .await
            .context("无法加载环境变量配置")?;
    }

    info!("配置已加载，共 {} 个配置层", store.provider_count().await);

    let container = ServiceContainerBuilder::new()
        .with_shared_store(store)
        .with_registry(classes::demo_registry())
        .with_config(ContainerConfig::default().with_services_key(args.services_key.clone()))
        .build()?;

    Ok(container)
}
