//! 页面层
//!
//! 每个 [`AppView`] 对应一个页面，通过 [`ViewRegistry`] 在首次激活时加载。
//! 页面内容只是占位，业务功能不在路由层的范围内。

use leptos::prelude::*;
use readmemo_router::app::AppView;
use readmemo_router::{RouteMatch, RouteParams, ViewLoadError, ViewRegistry};

use crate::session::use_session;
use crate::web::router::{Link, use_navigate, use_router};

/// 已加载的页面
#[derive(Clone, Copy)]
pub struct Page {
    /// 文档标题
    pub title: &'static str,
    pub render: fn(&RouteMatch<AppView>) -> AnyView,
}

impl Page {
    fn for_view(view: AppView) -> Self {
        match view {
            AppView::Welcome => Self::new("欢迎", |_| view! { <WelcomePage /> }.into_any()),
            AppView::Onboarding => Self::new("新手引导", |_| view! { <OnboardingPage /> }.into_any()),
            AppView::Login => Self::new("登录", |_| view! { <LoginPage /> }.into_any()),
            AppView::Register => Self::new("注册", |_| {
                placeholder("注册", "创建账号后即可同步书架与生词本。")
            }),
            AppView::ForgotPassword => Self::new("找回密码", |_| {
                placeholder("找回密码", "重置链接将发送到你的邮箱。")
            }),
            AppView::Bookshelf => Self::new("书架", |_| view! { <BookshelfPage /> }.into_any()),
            AppView::Upload => Self::new("上传", |_| placeholder("上传", "支持 EPUB 与 TXT 格式。")),
            AppView::Reader => Self::new("阅读", |m| {
                let id = m.param("id").unwrap_or_default().to_string();
                placeholder("阅读", format!("正在阅读第 {id} 本书"))
            }),
            AppView::DictionaryDetail => Self::new("词典", |m| {
                let word = m.param("word").unwrap_or_default().to_string();
                placeholder("词典", format!("“{word}” 的释义"))
            }),
            AppView::Vocabulary => {
                Self::new("生词本", |_| placeholder("生词本", "收藏的单词会出现在这里。"))
            }
            AppView::Review => Self::new("复习", |_| placeholder("复习", "今天没有待复习的单词。")),
            AppView::UserCenter => Self::new("个人中心", |_| view! { <UserCenterPage /> }.into_any()),
            AppView::Settings => Self::new("设置", |_| placeholder("设置", "阅读与复习偏好。")),
            AppView::SearchResults => Self::new("搜索", |m| {
                let query = m.location().query("q").unwrap_or_default().to_string();
                placeholder("搜索结果", format!("关键词：{query}"))
            }),
        }
    }

    fn new(title: &'static str, render: fn(&RouteMatch<AppView>) -> AnyView) -> Self {
        Self { title, render }
    }
}

/// 页面注册表：所有页面都是懒加载的
pub fn registry() -> ViewRegistry<AppView, Page> {
    AppView::ALL
        .into_iter()
        .fold(ViewRegistry::new(), |registry, view| {
            let page = Page::for_view(view);
            registry.register(view, move || std::future::ready(Ok::<_, ViewLoadError>(page)))
        })
}

/// 没有可渲染的路由时显示
pub fn not_found() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"页面未找到"</p>
                <Link to="/" attr:class="btn btn-primary mt-6">"返回首页"</Link>
            </div>
        </div>
    }
    .into_any()
}

fn placeholder(title: &'static str, body: impl Into<String>) -> AnyView {
    let body = body.into();
    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar />
            <main class="container mx-auto p-6">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">{title}</h2>
                        <p>{body}</p>
                    </div>
                </div>
            </main>
        </div>
    }
    .into_any()
}

#[component]
fn NavBar() -> impl IntoView {
    view! {
        <div class="navbar bg-base-100 shadow-sm">
            <div class="flex-1">
                <Link to="/" attr:class="btn btn-ghost text-xl">"ReadMemo"</Link>
            </div>
            <div class="flex-none gap-2">
                <Link to="/bookshelf" attr:class="btn btn-ghost btn-sm">"书架"</Link>
                <Link to="/vocabulary" attr:class="btn btn-ghost btn-sm">"生词本"</Link>
                <Link to="/review" attr:class="btn btn-ghost btn-sm">"复习"</Link>
                <Link to="/user" attr:class="btn btn-ghost btn-sm">"我的"</Link>
            </div>
        </div>
    }
}

#[component]
fn WelcomePage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-md">
                    <h1 class="text-5xl font-bold">"ReadMemo"</h1>
                    <p class="py-6">"边读边记，让生词不再生。"</p>
                    <div class="flex gap-2 justify-center">
                        <Link to="/onboarding" attr:class="btn btn-primary">"开始使用"</Link>
                        <Link to="/login" attr:class="btn btn-ghost">"已有账号"</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn OnboardingPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-md">
                    <h1 class="text-3xl font-bold">"三步开始"</h1>
                    <ul class="steps steps-vertical my-6">
                        <li class="step step-primary">"上传一本书"</li>
                        <li class="step">"阅读时收藏生词"</li>
                        <li class="step">"每天复习"</li>
                    </ul>
                    <Link to="/register" attr:class="btn btn-primary">"创建账号"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    // 演示登录：直接写入会话标记
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        session.sign_in();
        navigate("/bookshelf");
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-sm bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_submit>
                    <h2 class="card-title">"登录"</h2>
                    <input type="email" placeholder="邮箱" class="input input-bordered w-full" />
                    <input type="password" placeholder="密码" class="input input-bordered w-full" />
                    <button type="submit" class="btn btn-primary mt-2">"登录"</button>
                    <div class="flex justify-between text-sm mt-2">
                        <Link to="/register" attr:class="link">"注册"</Link>
                        <Link to="/forgot-password" attr:class="link">"忘记密码"</Link>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[component]
fn BookshelfPage() -> impl IntoView {
    let router = use_router();
    let (query, set_query) = signal(String::new());

    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let q = query.get_untracked();
        router.navigate(&format!("/search?q={}", urlencoding::encode(&q)));
    };
    let open_word = move |_| {
        router.navigate_named("DictionaryDetail", &RouteParams::new().with("word", "serendipity"));
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar />
            <main class="container mx-auto p-6 space-y-4">
                <form class="join w-full" on:submit=on_search>
                    <input
                        class="input input-bordered join-item w-full"
                        placeholder="搜索书籍或单词"
                        prop:value=query
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn btn-primary join-item">"搜索"</button>
                </form>
                <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                    <Link to="/reader/1" attr:class="card bg-base-100 shadow hover:shadow-lg">
                        <div class="card-body">"Pride and Prejudice"</div>
                    </Link>
                    <Link to="/upload" attr:class="card bg-base-100 shadow hover:shadow-lg">
                        <div class="card-body">"+ 上传新书"</div>
                    </Link>
                </div>
                <button class="btn btn-ghost btn-sm" on:click=open_word>"今日单词"</button>
            </main>
        </div>
    }
}

#[component]
fn UserCenterPage() -> impl IntoView {
    let session = use_session();

    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar />
            <main class="container mx-auto p-6">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">"个人中心"</h2>
                        <Link to="/settings" attr:class="link">"设置"</Link>
                        // 注销后由路由服务自动跳转到登录页
                        <button class="btn btn-error btn-outline mt-4" on:click=move |_| session.sign_out()>
                            "退出登录"
                        </button>
                    </div>
                </div>
            </main>
        </div>
    }
}
