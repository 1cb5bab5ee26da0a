//! 路由服务模块 - 核心引擎
//!
//! 把路由核心的 [`HistoryRouter`] 接入 Leptos：
//! 导航结果写入信号驱动界面，浏览器后退/前进和认证状态变化都会重新走守卫。

use std::rc::Rc;

use leptos::prelude::*;
use readmemo_router::app::{self, AppView};
use readmemo_router::{
    HistoryRouter, NavigationOutcome, RouteMatch, RouteParams, RouterConfig, RouterResult,
    StoredSessionFlag, ViewRegistry,
};
use wasm_bindgen::prelude::*;

use super::history::BrowserHistory;
use super::storage::BrowserStorage;
use crate::pages::Page;

type AppRouter = HistoryRouter<AppView, BrowserHistory>;

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 守卫读取 LocalStorage 中的会话标记；认证信号只用于触发重新校验。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号），首次导航失败时为 None
    current_route: ReadSignal<Option<RouteMatch<AppView>>>,
    set_route: WriteSignal<Option<RouteMatch<AppView>>>,
    router: StoredValue<AppRouter, LocalStorage>,
    history: StoredValue<BrowserHistory>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
}

impl RouterService {
    /// 创建路由服务并根据当前地址完成首次导航
    fn new(config: &RouterConfig, is_authenticated: Signal<bool>) -> RouterResult<Self> {
        let navigator = app::navigator(config)?;
        let history = BrowserHistory::new(&config.base);
        let session = StoredSessionFlag::new(BrowserStorage, config.session_key.clone());
        let mut router = HistoryRouter::new(navigator, history.clone(), Rc::new(session));

        if let Err(err) = router.start() {
            tracing::error!(target: "router", error = %err, "initial navigation failed");
        }
        let (current_route, set_route) = signal(router.current().cloned());

        Ok(Self {
            current_route,
            set_route,
            router: StoredValue::new_local(router),
            history: StoredValue::new(history),
            is_authenticated,
        })
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<Option<RouteMatch<AppView>>> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.run("push", |router| router.push(path));
    }

    /// 导航但替换当前 History 记录
    pub fn replace(&self, path: &str) {
        self.run("replace", |router| router.replace(path));
    }

    /// 按路由名导航
    pub fn navigate_named(&self, name: &str, params: &RouteParams) {
        self.run("push_named", |router| router.push_named(name, params));
    }

    /// 应用内路径对应的 href（带基础路径）
    pub fn href(&self, path: &str) -> String {
        self.history.with_value(|history| history.href(path))
    }

    /// 执行一次导航，结果变化时才更新信号
    fn run(
        &self,
        op: &str,
        f: impl FnOnce(&mut AppRouter) -> RouterResult<NavigationOutcome<AppView>>,
    ) {
        let Some(result) = self
            .router
            .try_update_value(|router| f(router).map(|_| router.current().cloned()))
        else {
            return;
        };

        match result {
            Ok(current) => {
                if self.current_route.with_untracked(|route| *route != current) {
                    self.set_route.set(current);
                }
            }
            Err(err) => {
                tracing::error!(target: "router", op, error = %err, "navigation failed");
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let service = *self;

        // popstate 时也执行守卫逻辑
        let closure = Closure::<dyn Fn()>::new(move || {
            service.run("popstate", |router| router.sync_with_history());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    ///
    /// 在受保护页面注销会被送回登录页；登录后停留在当前页面。
    fn setup_auth_redirect(&self) {
        let service = *self;

        Effect::new(move |prev: Option<bool>| {
            let is_auth = service.is_authenticated.get();
            if prev.is_some_and(|was| was != is_auth) {
                tracing::info!(target: "router", is_auth, "auth state changed, revalidating route");
                service.run("revalidate", |router| router.revalidate());
            }
            is_auth
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    config: &RouterConfig,
    is_authenticated: Signal<bool>,
) -> RouterResult<RouterService> {
    let router = RouterService::new(config, is_authenticated)?;

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    Ok(router)
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 路由配置
    config: RouterConfig,
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    match provide_router(&config, is_authenticated) {
        Ok(_) => children().into_any(),
        Err(err) => {
            tracing::error!(target: "router", error = %err, "router failed to start");
            view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <div class="alert alert-error max-w-lg">
                        <span>{err.to_string()}</span>
                    </div>
                </div>
            }
            .into_any()
        }
    }
}

/// 路由出口组件
///
/// 当前路由变化时按需加载对应页面，加载期间显示占位。
#[component]
pub fn RouterOutlet(
    /// 页面注册表工厂，每个出口持有一份
    pages: fn() -> ViewRegistry<AppView, Page>,
) -> impl IntoView {
    let router = use_router();
    let registry = Rc::new(pages());

    let active = LocalResource::new(move || {
        let registry = Rc::clone(&registry);
        let current = router.current_route().get();
        async move {
            let current = current?;
            let view = *current.view()?;
            let page = registry.load(&view).await;
            Some((current, page))
        }
    });

    view! {
        <Suspense fallback=|| view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }>
            {move || Suspend::new(async move {
                match active.await {
                    Some((current, Ok(page))) => {
                        document().set_title(&format!("{} - ReadMemo", page.title));
                        (page.render)(&current)
                    }
                    Some((_, Err(err))) => {
                        tracing::error!(target: "router", error = %err, "page failed to load");
                        view! {
                            <div class="flex items-center justify-center min-h-screen bg-base-200">
                                <div class="alert alert-error max-w-lg">
                                    <span>"页面加载失败，请重试"</span>
                                </div>
                            </div>
                        }
                        .into_any()
                    }
                    None => crate::pages::not_found(),
                }
            })}
        </Suspense>
    }
}

/// 应用内链接
///
/// 点击时走路由守卫，不触发整页刷新。样式通过 `attr:class` 传入。
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let href = router.href(&to);
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to);
    };

    view! {
        <a href=href on:click=on_click>
            {children()}
        </a>
    }
}
