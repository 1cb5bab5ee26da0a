//! 会话标记
//!
//! 认证状态由外部流程（登录/注销）写入持久化存储，路由侧只读。
//! 每次导航读取一次，生成注入守卫的 [`AuthState`]。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 标记为已认证时存储中的字面值
pub const AUTHENTICATED_VALUE: &str = "true";

/// 一次导航看到的认证状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthState {
    authenticated: bool,
}

impl AuthState {
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
        }
    }

    /// 按存储中的原始值判定，只有精确等于 `"true"` 才算已认证
    pub fn from_flag(raw: Option<&str>) -> Self {
        Self {
            authenticated: raw == Some(AUTHENTICATED_VALUE),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// 认证状态来源（依赖注入点）
pub trait SessionSource {
    fn auth_state(&self) -> AuthState;
}

/// 固定状态，便于测试或无持久化的宿主
impl SessionSource for AuthState {
    fn auth_state(&self) -> AuthState {
        *self
    }
}

/// 只读键值存储
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// 内存存储，供测试和非浏览器宿主使用
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) -> bool {
        self.items.borrow_mut().remove(key).is_some()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

/// 从键值存储读取会话标记
pub struct StoredSessionFlag<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> StoredSessionFlag<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: KeyValueStore> SessionSource for StoredSessionFlag<S> {
    fn auth_state(&self) -> AuthState {
        AuthState::from_flag(self.store.get(&self.key).as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_must_equal_literal_true() {
        assert!(AuthState::from_flag(Some("true")).is_authenticated());
        for raw in [None, Some("TRUE"), Some("1"), Some(""), Some("false"), Some(" true")] {
            assert!(!AuthState::from_flag(raw).is_authenticated(), "{raw:?}");
        }
    }

    #[test]
    fn test_stored_flag_follows_store_changes() {
        let store = Rc::new(MemoryStore::new());
        let flag = StoredSessionFlag::new(Rc::clone(&store), "isAuthenticated");
        assert_eq!(flag.auth_state(), AuthState::anonymous());

        store.set("isAuthenticated", "true");
        assert_eq!(flag.auth_state(), AuthState::authenticated());

        assert!(store.remove("isAuthenticated"));
        assert!(!flag.auth_state().is_authenticated());
    }

    #[test]
    fn test_stored_flag_reads_configured_key() {
        let store = MemoryStore::new();
        store.set("isAuthenticated", "true");
        let flag = StoredSessionFlag::new(store, "other");
        assert_eq!(flag.key(), "other");
        assert!(!flag.auth_state().is_authenticated());
    }
}
