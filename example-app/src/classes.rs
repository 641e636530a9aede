//! 示例类
//!
//! 注册到类注册表后，可以在 `config/services.json` 中通过类名引用

use di_abstractions::{Arguments, ClassDefinition, ServiceInstance};
use di_impl::ClassRegistry;
use infrastructure_common::InvocationError;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// 数据库连接
#[derive(Debug)]
pub struct Pdo {
    pub dsn: String,
    pub user: String,
}

/// 数据库访问对象
#[derive(Debug)]
pub struct Database {
    pub connection: Option<Arc<Pdo>>,
    pub charset: String,
}

/// 数据模型
#[derive(Debug, Default)]
pub struct Model {
    pub connection: Option<Arc<Pdo>>,
    pub table: Option<String>,
    pub columns: Vec<String>,
}

/// 输入校验器
#[derive(Debug, Default)]
pub struct Validator {
    pub locale: String,
    pub rules: Vec<Value>,
}

fn optional_service<T>(
    arguments: &Arguments,
    position: usize,
    name: &str,
) -> Result<Option<Arc<T>>, InvocationError>
where
    T: std::any::Any + Send + Sync,
{
    match arguments.param(position, name) {
        Some(_) => arguments.service::<T>(position, name).map(Some),
        None => Ok(None),
    }
}

/// 创建包含所有示例类的注册表
pub fn demo_registry() -> ClassRegistry {
    ClassRegistry::new()
        .with_class(ClassDefinition::builder(
            "Demo.Pdo",
            |arguments: &Arguments| {
                let dsn: String = arguments.value(0, "dsn")?;
                if dsn.is_empty() {
                    return Err(InvocationError::invalid_argument("dsn", "不能为空"));
                }
                info!("打开数据库连接: {}", dsn);
                Ok(Pdo {
                    dsn,
                    user: arguments
                        .optional_value(1, "user")?
                        .unwrap_or_else(|| "root".to_string()),
                })
            },
        ))
        .with_class(
            ClassDefinition::builder("Demo.Database", |arguments: &Arguments| {
                Ok(Database {
                    connection: optional_service(arguments, 0, "connection")?,
                    charset: "utf8mb4".to_string(),
                })
            })
            .method("setCharset", |database: &mut Database, arguments: &Arguments| {
                database.charset = arguments.value(0, "charset")?;
                Ok(())
            })
            .method("connect", |database: &mut Database, _: &Arguments| {
                match &database.connection {
                    Some(pdo) => {
                        info!("数据库已连接: {} ({})", pdo.dsn, database.charset);
                        Ok(())
                    }
                    None => Err(InvocationError::failed("未设置数据库连接")),
                }
            }),
        )
        .with_class(
            ClassDefinition::builder("Demo.Model", |arguments: &Arguments| {
                Ok(Model {
                    connection: optional_service(arguments, 0, "connection")?,
                    ..Model::default()
                })
            })
            .method("setConnection", |model: &mut Model, arguments: &Arguments| {
                model.connection = Some(arguments.service::<Pdo>(0, "connection")?);
                Ok(())
            })
            .method("setTable", |model: &mut Model, arguments: &Arguments| {
                model.table = Some(arguments.value(0, "table")?);
                Ok(())
            })
            .method("setColumns", |model: &mut Model, arguments: &Arguments| {
                model.columns = arguments.value(0, "columns")?;
                Ok(())
            }),
        )
        .with_class(
            ClassDefinition::builder("Demo.Validator", |arguments: &Arguments| {
                Ok(Validator {
                    locale: arguments
                        .optional_value(0, "locale")?
                        .unwrap_or_else(|| "en".to_string()),
                    rules: Vec::new(),
                })
            })
            .method("validate", |validator: &mut Validator, arguments: &Arguments| {
                validator.rules = arguments.value(0, "rules")?;
                Ok(())
            }),
        )
}

/// 以可读形式描述服务实例
pub fn describe(instance: &ServiceInstance) -> String {
    if let Some(pdo) = instance.downcast_ref::<Pdo>() {
        format!("Pdo {{ dsn: {}, user: {} }}", pdo.dsn, pdo.user)
    } else if let Some(database) = instance.downcast_ref::<Database>() {
        format!(
            "Database {{ connected: {}, charset: {} }}",
            database.connection.is_some(),
            database.charset
        )
    } else if let Some(model) = instance.downcast_ref::<Model>() {
        format!(
            "Model {{ table: {:?}, columns: {:?}, connected: {} }}",
            model.table,
            model.columns,
            model.connection.is_some()
        )
    } else if let Some(validator) = instance.downcast_ref::<Validator>() {
        format!(
            "Validator {{ locale: {}, rules: {} }}",
            validator.locale,
            Value::Array(validator.rules.clone())
        )
    } else {
        "<unknown>".to_string()
    }
}
