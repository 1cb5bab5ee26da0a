//! 导航守卫
//!
//! 守卫在每次导航之前同步执行，是 (路由元信息, 认证状态) 的纯函数，
//! 不修改任何状态。

use crate::route::RouteMatch;
use crate::session::AuthState;

/// 注入守卫的上下文，每次导航构造一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardContext {
    pub auth: AuthState,
}

impl GuardContext {
    pub fn new(auth: AuthState) -> Self {
        Self { auth }
    }
}

/// 守卫的裁决
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行
    Proceed,
    /// 放弃当前导航，改为导航到给定路径
    Redirect(String),
    /// 拒绝导航，停留在当前页面
    Abort,
}

pub trait NavigationGuard<V> {
    /// 用于日志和失败结果
    fn name(&self) -> &str;

    fn check(
        &self,
        to: &RouteMatch<V>,
        from: Option<&RouteMatch<V>>,
        ctx: &GuardContext,
    ) -> GuardDecision;
}

/// **核心守卫逻辑**：需要认证的路由在未认证时重定向到登录页
///
/// 原目标被放弃，登录后不会自动返回。
#[derive(Debug, Clone)]
pub struct RequireAuth {
    login_path: String,
}

impl RequireAuth {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

impl<V> NavigationGuard<V> for RequireAuth {
    fn name(&self) -> &str {
        "require_auth"
    }

    fn check(
        &self,
        to: &RouteMatch<V>,
        _from: Option<&RouteMatch<V>>,
        ctx: &GuardContext,
    ) -> GuardDecision {
        if to.requires_auth() && !ctx.auth.is_authenticated() {
            GuardDecision::Redirect(self.login_path.clone())
        } else {
            GuardDecision::Proceed
        }
    }
}

/// 由闭包实现的守卫
pub struct FnGuard<F> {
    name: String,
    check: F,
}

impl<F> FnGuard<F> {
    pub fn new<V>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&RouteMatch<V>, Option<&RouteMatch<V>>, &GuardContext) -> GuardDecision,
    {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<V, F> NavigationGuard<V> for FnGuard<F>
where
    F: Fn(&RouteMatch<V>, Option<&RouteMatch<V>>, &GuardContext) -> GuardDecision,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(
        &self,
        to: &RouteMatch<V>,
        from: Option<&RouteMatch<V>>,
        ctx: &GuardContext,
    ) -> GuardDecision {
        (self.check)(to, from, ctx)
    }
}
