//! 点分路径工具
//!
//! 配置键使用 `.` 分隔各级节点，例如 `db.host`；
//! 数字段在数组上按下标访问，例如 `servers.0.port`。

use serde_json::Value;

/// 按点分路径查找配置值
///
/// 空路径不指向任何配置值
pub fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }

    key.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// 递归收集所有点分键
pub fn collect_keys(root: &Value) -> Vec<String> {
    let mut keys = Vec::new();
    if let Value::Object(map) = root {
        collect_into(map, "", &mut keys);
    }
    keys
}

fn collect_into(map: &serde_json::Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        keys.push(full_key.clone());

        if let Value::Object(nested) = value {
            collect_into(nested, &full_key, keys);
        }
    }
}
