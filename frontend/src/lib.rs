//! ReadMemo 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `readmemo_router`: 路由表与守卫（领域模型，不依赖 DOM）
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话状态管理
//! - `pages`: UI 页面层

mod pages;
mod session;

use leptos::prelude::*;
use readmemo_router::RouterConfig;
use tracing::Level;

use crate::session::SessionContext;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod history;
    pub mod logging;
    pub mod router;
    pub mod storage;
}

use web::router::{Router, RouterOutlet};

/// 构建期变量，`READMEMO_` 前缀
fn build_var(name: &str) -> Option<String> {
    let value = match name {
        "BASE_URL" => option_env!("READMEMO_BASE_URL"),
        "LOGIN_PATH" => option_env!("READMEMO_LOGIN_PATH"),
        "SESSION_KEY" => option_env!("READMEMO_SESSION_KEY"),
        "MAX_REDIRECTS" => option_env!("READMEMO_MAX_REDIRECTS"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 安装控制台日志，debug 构建输出更多细节
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    web::logging::init(level);
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取路由配置
    let config = RouterConfig::from_vars(build_var).unwrap_or_else(|err| {
        tracing::error!(error = %err, "invalid build configuration, using defaults");
        RouterConfig::default()
    });

    // 2. 创建会话上下文（从 LocalStorage 恢复状态）
    let session = SessionContext::new(&config.session_key);
    provide_context(session);
    session.init_storage_listener();

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = session.is_authenticated_signal();

    view! {
        // 4. 路由器组件：守卫读取会话标记，认证变化时重新校验
        <Router config=config is_authenticated=is_authenticated>
            <RouterOutlet pages=pages::registry />
        </Router>
    }
}
