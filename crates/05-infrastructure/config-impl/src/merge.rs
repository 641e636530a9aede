//! 配置树合并

use serde_json::Value;

/// 将 `overlay` 深度合并到 `base`
///
/// 对象按键递归合并，其余类型（包括数组）由 `overlay` 整体替换。
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
