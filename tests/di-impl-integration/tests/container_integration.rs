//! 服务容器端到端测试：从 JSON/YAML 配置目录解析服务

use config_abstractions::ConfigStore;
use config_impl::{EnvironmentConfigProvider, LayeredConfigStore, MemoryConfigProvider};
use di_abstractions::{Arguments, ClassDefinition};
use di_impl::{ClassRegistry, ServiceContainer, ServiceContainerBuilder};
use infrastructure_common::{ContainerError, ErrorKind};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

const PDO: &str = "PDO";
const DATABASE: &str = "KrisRo\\PhpDatabaseModel\\Database";
const MODEL: &str = "KrisRo\\PhpDatabaseModel\\Model";
const VALIDATOR: &str = "KrisRo\\Validator\\Validator";

#[derive(Debug)]
struct Pdo {
    dsn: String,
    user: String,
}

#[derive(Debug)]
struct Database {
    connection: Arc<Pdo>,
    connected: bool,
}

#[derive(Debug, Default)]
struct Model {
    connection: Option<Arc<Pdo>>,
    table: Option<String>,
}

#[derive(Debug, Default)]
struct Validator {
    locale: Option<String>,
    rules: Vec<Value>,
}

fn registry() -> ClassRegistry {
    ClassRegistry::new()
        .with_class(ClassDefinition::builder(PDO, |arguments: &Arguments| {
            Ok(Pdo {
                dsn: arguments.value(0, "dsn")?,
                user: arguments.value(1, "username")?,
            })
        }))
        .with_class(
            ClassDefinition::builder(DATABASE, |arguments: &Arguments| {
                Ok(Database {
                    connection: arguments.service(0, "connection")?,
                    connected: false,
                })
            })
            .method("connect", |database: &mut Database, _: &Arguments| {
                database.connected = true;
                Ok(())
            }),
        )
        .with_class(
            ClassDefinition::builder(MODEL, |arguments: &Arguments| {
                let connection = match arguments.param(0, "connection") {
                    Some(_) => Some(arguments.service::<Pdo>(0, "connection")?),
                    None => None,
                };
                Ok(Model {
                    connection,
                    table: None,
                })
            })
            .method("setConnection", |model: &mut Model, arguments: &Arguments| {
                model.connection = Some(arguments.service(0, "connection")?);
                Ok(())
            })
            .method("setTable", |model: &mut Model, arguments: &Arguments| {
                model.table = Some(arguments.value(0, "table")?);
                Ok(())
            }),
        )
        .with_class(
            ClassDefinition::builder(VALIDATOR, |arguments: &Arguments| {
                Ok(Validator {
                    locale: arguments.optional_value(0, "locale")?,
                    rules: Vec::new(),
                })
            })
            .method("validate", |validator: &mut Validator, arguments: &Arguments| {
                validator.rules = arguments.value(0, "rules")?;
                Ok(())
            }),
        )
}

const SERVICES_JSON: &str = r##"{
  "services": {
    "pdo": {
      "class": "PDO",
      "_construct": { "0": "#database.dsn", "1": "#database.username" }
    },
    "model": {
      "class": "KrisRo\\PhpDatabaseModel\\Model",
      "_construct": ["@pdo"],
      "setTable": { "table": "users" }
    },
    "class_with_constructor_in_callable_string": {
      "class": "KrisRo\\PhpDatabaseModel\\Model::_construct",
      "_construct": ["@pdo"]
    },
    "class_with_specified_method_and_implicit_constructor": {
      "class": "KrisRo\\PhpDatabaseModel\\Database::connect",
      "Database": ["@pdo"]
    },
    "model_with_specified_method_and_array_argument": {
      "class": "KrisRo\\Validator\\Validator::validate",
      "validate": { "rules": ["req", "max:10"] }
    },
    "class_with_service_as_argument": {
      "class": "KrisRo\\PhpDatabaseModel\\Model",
      "setConnection": ["@pdo"]
    },
    "class_with_config_key_as_argument": {
      "class": "KrisRo\\Validator\\Validator",
      "_construct": { "locale": "#validator.locale" }
    }
  }
}"##;

const DATABASE_YAML: &str = "\
database:
  dsn: \"mysql:host=localhost;dbname=test\"
  username: root
validator:
  locale: en
";

/// 辅助函数：创建包含 YAML 配置和 JSON 服务注册表的配置目录
fn write_config_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("00-database.yaml"), DATABASE_YAML).unwrap();
    std::fs::write(dir.path().join("10-services.json"), SERVICES_JSON).unwrap();
    dir
}

async fn container_from(path: &Path) -> (Arc<LayeredConfigStore>, ServiceContainer) {
    let store = Arc::new(LayeredConfigStore::from_path(path).await.unwrap());
    let container = ServiceContainerBuilder::new()
        .with_shared_store(store.clone())
        .with_registry(registry())
        .build()
        .unwrap();
    (store, container)
}

/// 测试配置中声明的全部服务都能解析为正确的类型
#[tokio::test]
async fn test_resolve_declared_services() -> anyhow::Result<()> {
    let dir = write_config_dir();
    let (_, container) = container_from(dir.path()).await;

    let model = container.service_as::<Model>("model").await?;
    assert_eq!(model.table.as_deref(), Some("users"));

    container
        .service_as::<Model>("class_with_constructor_in_callable_string")
        .await?;

    let database = container
        .service_as::<Database>("class_with_specified_method_and_implicit_constructor")
        .await?;
    assert!(database.connected);

    let validator = container
        .service_as::<Validator>("model_with_specified_method_and_array_argument")
        .await?;
    assert_eq!(validator.rules, vec![json!("req"), json!("max:10")]);

    let pdo = container.service_as::<Pdo>("pdo").await?;
    assert_eq!(pdo.dsn, "mysql:host=localhost;dbname=test");
    assert_eq!(pdo.user, "root");

    let model = container
        .service_as::<Model>("class_with_service_as_argument")
        .await?;
    assert!(Arc::ptr_eq(model.connection.as_ref().unwrap(), &pdo));
    assert!(Arc::ptr_eq(&database.connection, &pdo));

    let validator = container
        .service_as::<Validator>("class_with_config_key_as_argument")
        .await?;
    assert_eq!(validator.locale.as_deref(), Some("en"));

    let stats = container.stats().await;
    assert_eq!(stats.declared_services, 7);
    assert_eq!(stats.resolved_services, 7);
    assert_eq!(stats.resolution_errors, 0);
    Ok(())
}

/// 测试 YAML 服务注册表与后加载文件的覆盖
#[tokio::test]
async fn test_yaml_registry_and_file_override() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("00-database.yaml"), DATABASE_YAML)?;
    std::fs::write(
        dir.path().join("10-services.yml"),
        "\
services:
  pdo:
    class: PDO
    _construct:
      - \"#database.dsn\"
      - \"#database.username\"
  validator:
    class: KrisRo\\Validator\\Validator::validate
    validate:
      rules: [\"req\", \"email\"]
",
    )?;
    std::fs::write(
        dir.path().join("20-local.json"),
        r#"{ "database": { "username": "deploy" } }"#,
    )?;

    let (_, container) = container_from(dir.path()).await;

    let pdo = container.service_as::<Pdo>("pdo").await?;
    assert_eq!(pdo.dsn, "mysql:host=localhost;dbname=test");
    assert_eq!(pdo.user, "deploy");

    let validator = container.service_as::<Validator>("validator").await?;
    assert_eq!(validator.rules, vec![json!("req"), json!("email")]);
    assert_eq!(container.declared_services().await, vec!["pdo", "validator"]);
    Ok(())
}

/// 测试配置修正并重新加载后，之前失败的服务可以解析
#[tokio::test]
async fn test_retry_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let services = dir.path().join("services.json");
    std::fs::write(
        &services,
        r##"{ "services": { "pdo": { "class": "PDO", "_construct": ["#database.dsn", "root"] } } }"##,
    )
    .unwrap();

    let (store, container) = container_from(dir.path()).await;

    let error = container.service("pdo").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Configuration);
    assert!(!container.is_resolved("pdo").await);

    std::fs::write(
        &services,
        r##"{
          "database": { "dsn": "sqlite::memory:" },
          "services": { "pdo": { "class": "PDO", "_construct": ["#database.dsn", "root"] } }
        }"##,
    )
    .unwrap();
    store.reload_all().await.unwrap();

    let pdo = container.service_as::<Pdo>("pdo").await.unwrap();
    assert_eq!(pdo.dsn, "sqlite::memory:");
    assert_eq!(container.stats().await.resolution_errors, 1);
}

/// 测试环境变量覆盖服务参数引用的配置
#[tokio::test]
async fn test_environment_overrides_config_reference() {
    let dir = write_config_dir();
    let (store, container) = container_from(dir.path()).await;

    let provider = EnvironmentConfigProvider::new("DI_IT");
    let overrides = provider.build_tree(vec![(
        "DI_IT__DATABASE__USERNAME".to_string(),
        "reporting".to_string(),
    )]);
    assert_eq!(overrides, json!({ "database": { "username": "reporting" } }));

    store
        .register_provider(Box::new(
            MemoryConfigProvider::new(overrides).with_priority(200),
        ))
        .await
        .unwrap();

    let pdo = container.service_as::<Pdo>("pdo").await.unwrap();
    assert_eq!(pdo.user, "reporting");
}

/// 测试未声明和未注册的服务
#[tokio::test]
async fn test_resolution_errors() {
    let dir = write_config_dir();
    std::fs::write(
        dir.path().join("20-extra.json"),
        r#"{ "services": { "mailer": { "class": "App\\Mailer", "send": [] } } }"#,
    )
    .unwrap();
    let (_, container) = container_from(dir.path()).await;

    assert!(matches!(
        container.service("cache").await,
        Err(ContainerError::ServiceNotDeclared { .. })
    ));

    let error = container.service("mailer").await.unwrap_err();
    assert!(matches!(error, ContainerError::UnresolvableMethod { .. }));
    assert!(error.to_string().contains("mailer"));

    assert!(container.service("pdo").await.is_ok());
    assert_eq!(container.stats().await.resolution_errors, 2);
}
