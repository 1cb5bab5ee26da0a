//! 浏览器 History 实现
//!
//! 所有对 window.history 的操作都集中在此模块。

use readmemo_router::History;
use readmemo_router::history::{normalize_base, strip_base, with_base};
use wasm_bindgen::JsValue;

/// 获取当前浏览器完整路径 (pathname + search + hash)
fn current_full_path() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return "/".to_string();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    format!("{path}{search}{hash}")
}

fn browser_history() -> Option<web_sys::History> {
    web_sys::window()?.history().ok()
}

/// 基于 History API 的实现，读写时处理基础路径
#[derive(Debug, Clone)]
pub struct BrowserHistory {
    base: String,
}

impl BrowserHistory {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base(base),
        }
    }

    /// 应用内路径对应的真实 href
    pub fn href(&self, full_path: &str) -> String {
        with_base(&self.base, full_path)
    }
}

impl History for BrowserHistory {
    fn location(&self) -> String {
        strip_base(&self.base, &current_full_path())
    }

    fn push(&mut self, full_path: &str) {
        if let Some(history) = browser_history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&self.href(full_path)));
        }
    }

    fn replace(&mut self, full_path: &str) {
        if let Some(history) = browser_history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&self.href(full_path)));
        }
    }
}
