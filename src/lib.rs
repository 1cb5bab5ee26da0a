//! ReadMemo 客户端路由核心
//!
//! 与宿主无关的路由引擎，前端 crate 在此之上接入浏览器 History 与 LocalStorage：
//! - `route`: 路径模式、参数、元信息与路由表
//! - `guard`: 导航守卫（认证检查）
//! - `session`: 会话标记的读取抽象
//! - `view`: 视图懒加载与缓存
//! - `navigation`: 解析 -> 重定向 -> 守卫的导航流程
//! - `router`: 组合导航器、History 与会话来源的路由服务
//! - `app`: ReadMemo 的页面与路由表

pub mod app;
pub mod config;
pub mod error;
pub mod guard;
pub mod history;
pub mod location;
pub mod navigation;
pub mod route;
pub mod router;
pub mod session;
pub mod view;

pub use app::AppView;
pub use config::RouterConfig;
pub use error::{RouterError, RouterErrorKind, RouterResult};
pub use guard::{GuardContext, GuardDecision, NavigationGuard, RequireAuth};
pub use history::{History, HistoryMode, MemoryHistory};
pub use location::Location;
pub use navigation::{Navigation, NavigationId, NavigationOutcome, Navigator};
pub use route::{RouteDef, RouteMatch, RouteMeta, RouteParams, RouteTable};
pub use router::HistoryRouter;
pub use session::{AuthState, KeyValueStore, MemoryStore, SessionSource, StoredSessionFlag};
pub use view::{LazyView, ViewLoadError, ViewLoader, ViewRegistry};
