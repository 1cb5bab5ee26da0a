//! 会话标记的持久化
//!
//! 守卫通过 [`KeyValueStore`] 只读访问；写入只发生在登录/注销流程中。

use readmemo_router::KeyValueStore;

/// 浏览器 LocalStorage，window 或存储不可用时视为空
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    pub fn read(key: &str) -> Option<String> {
        Self::local()?.get_item(key).ok().flatten()
    }

    /// 写入失败（隐私模式、配额）时返回 false
    pub fn write(key: &str, value: &str) -> bool {
        Self::local().is_some_and(|s| s.set_item(key, value).is_ok())
    }

    pub fn remove(key: &str) -> bool {
        Self::local().is_some_and(|s| s.remove_item(key).is_ok())
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::read(key)
    }
}
