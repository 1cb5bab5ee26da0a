use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 路由元信息
///
/// `requiresAuth` 是守卫唯一关心的标记，单独建模；
/// 其余业务标记保存在 `extra` 中，序列化时与其平铺在一起。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    /// 是否需要认证，缺省为 false
    #[serde(default)]
    pub requires_auth: bool,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RouteMeta {
    /// 需要认证的路由
    pub fn protected() -> Self {
        Self {
            requires_auth: true,
            ..Self::default()
        }
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// 读取任意标记；`requiresAuth` 也可以通过这里按名读取
    pub fn flag(&self, key: &str) -> Option<Value> {
        if key == "requiresAuth" {
            return Some(Value::Bool(self.requires_auth));
        }
        self.extra.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_public() {
        let meta = RouteMeta::default();
        assert!(!meta.requires_auth);
        assert_eq!(meta.flag("requiresAuth"), Some(Value::Bool(false)));
        assert_eq!(meta.flag("title"), None);
    }

    #[test]
    fn test_flags_flatten_in_json() {
        let meta = RouteMeta::protected().with_flag("title", "书架");
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value, json!({ "requiresAuth": true, "title": "书架" }));

        let parsed: RouteMeta = serde_json::from_value(json!({ "keepAlive": true })).unwrap();
        assert!(!parsed.requires_auth);
        assert_eq!(parsed.flag("keepAlive"), Some(Value::Bool(true)));
    }
}
