//! ReadMemo 路由表 - 领域模型
//!
//! 纯粹的业务定义，不依赖 DOM。
//! 声明了应用的所有页面、路径及是否需要认证。

use std::fmt::Display;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::RouterConfig;
use crate::error::RouterResult;
use crate::navigation::Navigator;
use crate::route::{RouteDef, RouteTable};

/// 未匹配路径的兜底模式
pub const CATCH_ALL_PATTERN: &str = "/:pathMatch(.*)*";
/// 兜底路由的重定向目标
pub const ROOT_PATH: &str = "/";

/// 应用页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppView {
    Welcome,
    Onboarding,
    Login,
    Register,
    ForgotPassword,
    Bookshelf,
    Upload,
    Reader,
    DictionaryDetail,
    Vocabulary,
    Review,
    UserCenter,
    Settings,
    SearchResults,
}

impl AppView {
    pub const ALL: [AppView; 14] = [
        AppView::Welcome,
        AppView::Onboarding,
        AppView::Login,
        AppView::Register,
        AppView::ForgotPassword,
        AppView::Bookshelf,
        AppView::Upload,
        AppView::Reader,
        AppView::DictionaryDetail,
        AppView::Vocabulary,
        AppView::Review,
        AppView::UserCenter,
        AppView::Settings,
        AppView::SearchResults,
    ];

    /// 路由名（与页面同名）
    pub fn route_name(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Onboarding => "Onboarding",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::ForgotPassword => "ForgotPassword",
            Self::Bookshelf => "Bookshelf",
            Self::Upload => "Upload",
            Self::Reader => "Reader",
            Self::DictionaryDetail => "DictionaryDetail",
            Self::Vocabulary => "Vocabulary",
            Self::Review => "Review",
            Self::UserCenter => "UserCenter",
            Self::Settings => "Settings",
            Self::SearchResults => "SearchResults",
        }
    }

    /// 路径模式
    pub fn path_pattern(&self) -> &'static str {
        match self {
            Self::Welcome => "/",
            Self::Onboarding => "/onboarding",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ForgotPassword => "/forgot-password",
            Self::Bookshelf => "/bookshelf",
            Self::Upload => "/upload",
            Self::Reader => "/reader/:id",
            Self::DictionaryDetail => "/dictionary/:word",
            Self::Vocabulary => "/vocabulary",
            Self::Review => "/review",
            Self::UserCenter => "/user",
            Self::Settings => "/settings",
            Self::SearchResults => "/search",
        }
    }

    /// **核心守卫配置：该页面是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Bookshelf
                | Self::Upload
                | Self::Reader
                | Self::DictionaryDetail
                | Self::Vocabulary
                | Self::Review
                | Self::UserCenter
                | Self::SearchResults
        )
    }
}

impl Display for AppView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.route_name())
    }
}

/// 构建 ReadMemo 路由表
pub fn route_table() -> RouterResult<RouteTable<AppView>> {
    let mut builder = RouteTable::builder();
    for view in AppView::ALL {
        let mut def = RouteDef::view(view.path_pattern(), view).named(view.route_name());
        if view.requires_auth() {
            def = def.requires_auth();
        }
        builder = builder.route(def);
    }
    builder
        .route(RouteDef::redirect(CATCH_ALL_PATTERN, ROOT_PATH))
        .build()
}

/// 按配置创建带认证守卫的导航器
pub fn navigator(config: &RouterConfig) -> RouterResult<Navigator<AppView>> {
    config.validate()?;
    Ok(Navigator::new(Arc::new(route_table()?), config))
}
