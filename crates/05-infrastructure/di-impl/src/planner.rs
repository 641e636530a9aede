//! 方法调用计划
//!
//! 构造函数总是排在计划首位；类声明中的显式方法紧随其后，
//! 其余方法按服务条目中的声明顺序排列。

use crate::registry::ClassRegistry;
use di_abstractions::{Arguments, ClassSpec, CONSTRUCTOR};

/// 有序的方法调用计划
#[derive(Debug, Clone)]
pub struct MethodPlan {
    entries: Vec<(String, Arguments)>,
}

impl MethodPlan {
    /// 创建只包含构造函数的计划
    pub fn new() -> Self {
        Self {
            entries: vec![(CONSTRUCTOR.to_string(), Arguments::new())],
        }
    }

    /// 以空参数加入方法，已存在时不做修改
    pub fn seed(&mut self, method: &str) {
        if !self.contains(method) {
            self.entries.push((method.to_string(), Arguments::new()));
        }
    }

    /// 设置方法参数，已存在的方法保持原位置
    pub fn set(&mut self, method: &str, arguments: Arguments) {
        match self.entries.iter_mut().find(|(name, _)| name == method) {
            Some(entry) => entry.1 = arguments,
            None => self.entries.push((method.to_string(), arguments)),
        }
    }

    /// 计划中是否包含方法
    pub fn contains(&self, method: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == method)
    }

    /// 按顺序返回方法名
    pub fn methods(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// 取出构造函数参数，计划中只剩普通方法
    pub fn take_constructor(&mut self) -> Arguments {
        match self.entries.iter().position(|(name, _)| name == CONSTRUCTOR) {
            Some(index) => self.entries.remove(index).1,
            None => Arguments::new(),
        }
    }

    /// 转换为方法调用列表
    pub fn into_calls(self) -> Vec<(String, Arguments)> {
        self.entries
    }
}

impl Default for MethodPlan {
    fn default() -> Self {
        Self::new()
    }
}

/// 方法在计划中使用的名称，类名构造函数归一为 `_construct`
pub fn normalize_method<'a>(class: &ClassSpec, method: &'a str) -> &'a str {
    if class.is_constructor_alias(method) {
        CONSTRUCTOR
    } else {
        method
    }
}

/// 方法能否解析为可调用对象
pub fn is_callable(registry: &ClassRegistry, class: &ClassSpec, method: &str) -> bool {
    class.is_constructor_alias(method) || registry.has_method(&class.class_name, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{Argument, ClassDefinition};
    use serde_json::json;

    struct Widget;

    fn registry() -> ClassRegistry {
        ClassRegistry::new().with_class(
            ClassDefinition::builder("App.Widget", |_: &Arguments| Ok(Widget))
                .method("render", |_: &mut Widget, _: &Arguments| Ok(())),
        )
    }

    #[test]
    fn test_plan_keeps_first_insertion_position() {
        let mut plan = MethodPlan::new();
        plan.seed("render");
        plan.set("resize", Arguments::new());
        plan.set(
            CONSTRUCTOR,
            Arguments::new().with(0usize, Argument::Value(json!("x"))),
        );
        plan.seed("render");

        assert_eq!(plan.methods(), vec!["_construct", "render", "resize"]);

        let constructor = plan.take_constructor();
        assert_eq!(constructor.len(), 1);
        assert_eq!(plan.methods(), vec!["render", "resize"]);
        assert!(plan.take_constructor().is_empty());
    }

    #[test]
    fn test_is_callable() {
        let registry = registry();
        let class = ClassSpec::parse("App.Widget");

        assert!(is_callable(&registry, &class, "_construct"));
        assert!(is_callable(&registry, &class, "Widget"));
        assert!(is_callable(&registry, &class, "render"));
        assert!(!is_callable(&registry, &class, "resize"));

        let unknown = ClassSpec::parse("App.Unknown");
        assert!(is_callable(&registry, &unknown, "Unknown"));
        assert!(!is_callable(&registry, &unknown, "render"));
    }

    #[test]
    fn test_normalize_method() {
        let class = ClassSpec::parse("App.Widget::Widget");
        assert_eq!(normalize_method(&class, "Widget"), "_construct");
        assert_eq!(normalize_method(&class, "render"), "render");
    }
}
