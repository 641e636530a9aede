//! 类工厂
//!
//! 类名到构造函数和方法表的映射，替代按名称动态加载类

use crate::argument::Arguments;
use infrastructure_common::InvocationError;
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// 构造中的服务对象
pub type ServiceObject = Box<dyn Any + Send + Sync>;

/// 构造函数类型
pub type ConstructorFn =
    Arc<dyn Fn(&Arguments) -> Result<ServiceObject, InvocationError> + Send + Sync>;

/// 方法函数类型
pub type MethodFn = Arc<
    dyn Fn(&mut (dyn Any + Send + Sync), &Arguments) -> Result<(), InvocationError>
        + Send
        + Sync,
>;

/// 类定义
///
/// 由 [`ClassDefinition::builder`] 创建，注册到类注册表后可被服务配置引用
#[derive(Clone)]
pub struct ClassDefinition {
    name: String,
    type_name: &'static str,
    constructor: ConstructorFn,
    methods: HashMap<String, MethodFn>,
}

impl std::fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("methods", &self.method_names())
            .field("constructor", &"<function>")
            .finish()
    }
}

impl ClassDefinition {
    /// 创建类定义构建器
    pub fn builder<T, F>(name: impl Into<String>, constructor: F) -> ClassDefinitionBuilder<T>
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T, InvocationError> + Send + Sync + 'static,
    {
        ClassDefinitionBuilder {
            definition: ClassDefinition {
                name: name.into(),
                type_name: std::any::type_name::<T>(),
                constructor: Arc::new(move |arguments: &Arguments| {
                    constructor(arguments).map(|instance| Box::new(instance) as ServiceObject)
                }),
                methods: HashMap::new(),
            },
            _marker: PhantomData,
        }
    }

    /// 获取类名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取实例的 Rust 类型名
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 是否注册了指定方法
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// 已注册的方法名（排序后）
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 调用构造函数创建实例
    pub fn instantiate(&self, arguments: &Arguments) -> Result<ServiceObject, InvocationError> {
        (self.constructor)(arguments)
    }

    /// 在实例上调用方法
    pub fn invoke(
        &self,
        object: &mut (dyn Any + Send + Sync),
        method: &str,
        arguments: &Arguments,
    ) -> Result<(), InvocationError> {
        let method_fn = self
            .methods
            .get(method)
            .ok_or_else(|| InvocationError::UnknownMethod {
                class_name: self.name.clone(),
                method: method.to_string(),
            })?;

        method_fn(object, arguments)
    }
}

/// 类定义构建器
pub struct ClassDefinitionBuilder<T> {
    definition: ClassDefinition,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ClassDefinitionBuilder<T>
where
    T: Any + Send + Sync,
{
    /// 注册方法
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut T, &Arguments) -> Result<(), InvocationError> + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();
        let method_fn: MethodFn = Arc::new(
            move |object: &mut (dyn Any + Send + Sync), arguments: &Arguments| {
                let instance = object.downcast_mut::<T>().ok_or_else(|| {
                    InvocationError::failed(format!(
                        "方法 {} 的接收者类型不是 {}",
                        method_name,
                        std::any::type_name::<T>()
                    ))
                })?;
                method(instance, arguments)
            },
        );

        self.definition.methods.insert(name, method_fn);
        self
    }

    /// 完成构建
    pub fn build(self) -> ClassDefinition {
        self.definition
    }
}

impl<T> From<ClassDefinitionBuilder<T>> for ClassDefinition {
    fn from(builder: ClassDefinitionBuilder<T>) -> Self {
        builder.definition
    }
}
