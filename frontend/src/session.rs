//! 会话模块
//!
//! 登录/注销流程写入 LocalStorage 中的会话标记，路由守卫只读该标记。
//! 信号用于驱动界面和认证变化后的路由重新校验。

use leptos::prelude::*;
use readmemo_router::session::AUTHENTICATED_VALUE;
use wasm_bindgen::prelude::*;

use crate::web::storage::BrowserStorage;

/// 会话上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    is_authenticated: ReadSignal<bool>,
    set_authenticated: WriteSignal<bool>,
    /// 会话标记在 LocalStorage 中的键
    key: StoredValue<String>,
}

impl SessionContext {
    /// 创建会话上下文，初始状态取自 LocalStorage
    pub fn new(key: &str) -> Self {
        let stored = BrowserStorage::read(key);
        let (is_authenticated, set_authenticated) =
            signal(stored.as_deref() == Some(AUTHENTICATED_VALUE));
        Self {
            is_authenticated,
            set_authenticated,
            key: StoredValue::new(key.to_string()),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        self.is_authenticated.into()
    }

    /// 标记已登录
    ///
    /// 凭据校验属于登录页的职责，这里只负责持久化标记。
    pub fn sign_in(&self) {
        let key = self.key.get_value();
        if !BrowserStorage::write(&key, AUTHENTICATED_VALUE) {
            tracing::error!(target: "session", key = %key, "failed to persist session flag");
        }
        tracing::info!(target: "session", "signed in");
        self.set_authenticated.set(true);
    }

    /// 注销
    ///
    /// 不需要手动导航，路由服务监听认证状态变化后会重新校验当前路由。
    pub fn sign_out(&self) {
        let key = self.key.get_value();
        if !BrowserStorage::remove(&key) {
            // 标记仍在存储中，守卫会继续放行受保护页面
            tracing::error!(target: "session", key = %key, "failed to clear session flag");
        }
        tracing::info!(target: "session", "signed out");
        self.set_authenticated.set(false);
    }

    /// 监听其他标签页对会话标记的修改
    pub fn init_storage_listener(&self) {
        let key = self.key;
        let set_authenticated = self.set_authenticated;

        let closure = Closure::<dyn Fn(web_sys::StorageEvent)>::new(
            move |event: web_sys::StorageEvent| {
                // key 为空表示整个存储被清空
                let matches = event
                    .key()
                    .is_none_or(|changed| key.with_value(|k| *k == changed));
                if matches {
                    let signed_in = event.new_value().as_deref() == Some(AUTHENTICATED_VALUE);
                    tracing::debug!(target: "session", signed_in, "session flag changed in another tab");
                    set_authenticated.set(signed_in);
                }
            },
        );

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}
