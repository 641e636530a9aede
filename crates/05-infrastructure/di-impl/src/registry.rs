//! 类注册表

use di_abstractions::ClassDefinition;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 类注册表
///
/// 服务配置中的 `class` 通过此注册表映射到构造函数和方法表
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDefinition>,
}

impl ClassRegistry {
    /// 创建空的类注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类，同名类会被替换
    pub fn register(&mut self, class: impl Into<ClassDefinition>) {
        let class = class.into();
        let name = class.name().to_string();

        debug!("注册类: {} ({})", name, class.type_name());
        if self.classes.insert(name.clone(), class).is_some() {
            warn!("类 {} 已注册，旧定义被替换", name);
        }
    }

    /// 以构建器方式注册类
    pub fn with_class(mut self, class: impl Into<ClassDefinition>) -> Self {
        self.register(class);
        self
    }

    /// 获取类定义
    pub fn get(&self, class_name: &str) -> Option<&ClassDefinition> {
        self.classes.get(class_name)
    }

    /// 是否注册了指定类
    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// 指定类是否注册了指定方法
    pub fn has_method(&self, class_name: &str, method: &str) -> bool {
        self.get(class_name)
            .map(|class| class.has_method(method))
            .unwrap_or(false)
    }

    /// 已注册的类名（排序后）
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 已注册类的数量
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// 是否没有注册任何类
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
