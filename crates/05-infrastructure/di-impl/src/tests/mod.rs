//! 服务容器测试


use super::*;
use config_abstractions::ConfigStore;
use config_impl::{LayeredConfigStore, MemoryConfigProvider};
use di_abstractions::{Arguments, ClassDefinition};
use infrastructure_common::InvocationError;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct Pdo {
    pub dsn: String,
    pub user: Option<String>,
}

#[derive(Debug)]
pub(crate) struct Model {
    pub connection: Option<Arc<Pdo>>,
    pub table: Option<String>,
    pub calls: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct Validator {
    pub rules: Vec<Value>,
    pub locale: Option<String>,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub next: Option<Arc<Node>>,
}

/// 测试用类及其调用计数
#[derive(Debug, Default)]
pub(crate) struct Fixtures {
    pub pdo_constructed: Arc<AtomicUsize>,
    pub models_constructed: Arc<AtomicUsize>,
    pub setup_calls: Arc<AtomicUsize>,
}

impl Fixtures {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn registry(&self) -> ClassRegistry {
        let pdo_constructed = self.pdo_constructed.clone();
        let models_constructed = self.models_constructed.clone();
        let setup_calls = self.setup_calls.clone();

        ClassRegistry::new()
            .with_class(ClassDefinition::builder(
                "App.Pdo",
                move |arguments: &Arguments| {
                    pdo_constructed.fetch_add(1, Ordering::SeqCst);
                    Ok(Pdo {
                        dsn: arguments.value(0, "dsn")?,
                        user: arguments.optional_value(1, "user")?,
                    })
                },
            ))
            .with_class(
                ClassDefinition::builder("App.Model", move |arguments: &Arguments| {
                    models_constructed.fetch_add(1, Ordering::SeqCst);
                    let connection = match arguments.param(0, "connection") {
                        Some(_) => Some(arguments.service::<Pdo>(0, "connection")?),
                        None => None,
                    };
                    Ok(Model {
                        connection,
                        table: None,
                        calls: Vec::new(),
                    })
                })
                .method("setTable", |model: &mut Model, arguments: &Arguments| {
                    model.table = Some(arguments.value(0, "table")?);
                    model.calls.push("setTable".to_string());
                    Ok(())
                })
                .method("setConnection", |model: &mut Model, arguments: &Arguments| {
                    model.connection = Some(arguments.service::<Pdo>(0, "connection")?);
                    model.calls.push("setConnection".to_string());
                    Ok(())
                })
                .method("setup", move |model: &mut Model, _: &Arguments| {
                    setup_calls.fetch_add(1, Ordering::SeqCst);
                    model.calls.push("setup".to_string());
                    Ok(())
                })
                .method("fail", |_: &mut Model, _: &Arguments| {
                    Err(InvocationError::failed("连接已关闭"))
                }),
            )
            .with_class(
                ClassDefinition::builder("App.Validator", |arguments: &Arguments| {
                    Ok(Validator {
                        rules: Vec::new(),
                        locale: arguments.optional_value(0, "locale")?,
                    })
                })
                .method("validate", |validator: &mut Validator, arguments: &Arguments| {
                    validator.rules = arguments.value(0, "rules")?;
                    Ok(())
                }),
            )
            .with_class(ClassDefinition::builder(
                "App.Node",
                |arguments: &Arguments| {
                    let next = match arguments.param(0, "next") {
                        Some(_) => Some(arguments.service::<Node>(0, "next")?),
                        None => None,
                    };
                    Ok(Node { next })
                },
            ))
    }
}

/// 辅助函数：用内存配置创建容器，同时返回可继续修改的配置存储
pub(crate) async fn container_with(
    config: Value,
    fixtures: &Fixtures,
) -> (Arc<LayeredConfigStore>, ServiceContainer) {
    let store = Arc::new(LayeredConfigStore::new());
    store
        .register_provider(Box::new(MemoryConfigProvider::new(config)))
        .await
        .unwrap();

    let container = ServiceContainerBuilder::new()
        .with_shared_store(store.clone())
        .with_registry(fixtures.registry())
        .build()
        .unwrap();

    (store, container)
}
