//! 导航引擎
//!
//! 流程：解析目标 -> 匹配路由 -> 跟随重定向路由 -> 去重 -> 守卫 -> 结果。
//! 守卫的重定向会开启新一轮解析，总重定向次数受配置限制。

use std::fmt::Display;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::RouterConfig;
use crate::error::{RouterError, RouterResult};
use crate::guard::{GuardContext, GuardDecision, NavigationGuard, RequireAuth};
use crate::location::Location;
use crate::route::{RouteMatch, RouteParams, RouteTable};

/// 单次导航的标识，用于日志关联
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationId(Uuid);

impl NavigationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for NavigationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 成功完成的导航
#[derive(Debug, Clone)]
pub struct Navigation<V> {
    pub id: NavigationId,
    pub to: RouteMatch<V>,
    pub from: Option<RouteMatch<V>>,
    /// 发生过重定向时，记录最初请求的位置
    pub redirected_from: Option<Location>,
}

impl<V> Navigation<V> {
    pub fn was_redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

/// 一次导航尝试的结果
#[derive(Debug, Clone)]
pub enum NavigationOutcome<V> {
    Completed(Navigation<V>),
    /// 目标与当前位置相同，未产生新记录
    Duplicated,
    /// 被守卫拒绝，停留在原位置
    Aborted { guard: String },
}

impl<V> NavigationOutcome<V> {
    pub fn completed(&self) -> Option<&Navigation<V>> {
        match self {
            NavigationOutcome::Completed(navigation) => Some(navigation),
            _ => None,
        }
    }
}

/// 路由表 + 守卫链
pub struct Navigator<V> {
    table: Arc<RouteTable<V>>,
    guards: Vec<Box<dyn NavigationGuard<V>>>,
    max_redirects: usize,
}

impl<V> Navigator<V> {
    /// 创建导航器，并注册默认的认证守卫
    pub fn new(table: Arc<RouteTable<V>>, config: &RouterConfig) -> Self {
        Self {
            table,
            guards: vec![Box::new(RequireAuth::new(config.login_path.clone()))],
            max_redirects: config.max_redirects,
        }
    }

    /// 追加守卫，按注册顺序执行
    pub fn with_guard(mut self, guard: impl NavigationGuard<V> + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn table(&self) -> &Arc<RouteTable<V>> {
        &self.table
    }

    pub fn resolve(&self, target: &str) -> RouterResult<RouteMatch<V>> {
        let location = Location::parse(target)?;
        self.table.resolve(&location).ok_or_else(|| {
            RouterError::no_match(format!("no route matches {location}")).in_op("navigator.resolve")
        })
    }

    pub fn path_for(&self, name: &str, params: &RouteParams) -> RouterResult<String> {
        self.table.path_for(name, params)
    }

    /// **核心方法：导航与守卫**
    ///
    /// `force` 为 true 时跳过对最初目标的去重检查，用于认证状态变化后重新校验当前路由。
    pub fn navigate(
        &self,
        target: &str,
        from: Option<&RouteMatch<V>>,
        ctx: &GuardContext,
        force: bool,
    ) -> RouterResult<NavigationOutcome<V>> {
        let id = NavigationId::new();
        let requested = Location::parse(target).map_err(|e| e.in_op("navigate"))?;
        let mut location = requested.clone();
        let mut redirects = 0;
        let mut skip_duplicate_check = force;

        tracing::debug!(target: "router", navigation = %id, to = %requested, "navigation started");

        loop {
            let matched = self.table.resolve(&location).ok_or_else(|| {
                RouterError::no_match(format!("no route matches {location}"))
                    .in_op_with("navigate", requested.to_string())
            })?;

            // 重定向路由：不经过守卫，直接替换目标
            if let Some(to) = matched.redirect_target() {
                location = self.redirect(id, &requested, &location, to, &mut redirects)?;
                continue;
            }

            if !skip_duplicate_check && from.is_some_and(|f| f.location() == matched.location()) {
                tracing::debug!(target: "router", navigation = %id, at = %location, "navigation duplicated");
                return Ok(NavigationOutcome::Duplicated);
            }
            skip_duplicate_check = false;

            match self.run_guards(&matched, from, ctx) {
                (GuardDecision::Proceed, _) => {
                    let redirected_from = (redirects > 0).then(|| requested.clone());
                    tracing::debug!(
                        target: "router",
                        navigation = %id,
                        to = %location,
                        redirected = redirected_from.is_some(),
                        "navigation completed"
                    );
                    return Ok(NavigationOutcome::Completed(Navigation {
                        id,
                        to: matched,
                        from: from.cloned(),
                        redirected_from,
                    }));
                }
                (GuardDecision::Redirect(to), guard) => {
                    tracing::warn!(
                        target: "router",
                        navigation = %id,
                        guard,
                        denied = %location,
                        redirect = %to,
                        "access denied, redirecting"
                    );
                    location = self.redirect(id, &requested, &location, &to, &mut redirects)?;
                }
                (GuardDecision::Abort, guard) => {
                    tracing::info!(target: "router", navigation = %id, guard, at = %location, "navigation aborted");
                    return Ok(NavigationOutcome::Aborted {
                        guard: guard.to_string(),
                    });
                }
            }
        }
    }

    /// 依次执行守卫，第一个非放行裁决生效
    fn run_guards<'a>(
        &'a self,
        to: &RouteMatch<V>,
        from: Option<&RouteMatch<V>>,
        ctx: &GuardContext,
    ) -> (GuardDecision, &'a str) {
        for guard in &self.guards {
            let decision = guard.check(to, from, ctx);
            if decision != GuardDecision::Proceed {
                return (decision, guard.name());
            }
        }
        (GuardDecision::Proceed, "")
    }

    fn redirect(
        &self,
        id: NavigationId,
        requested: &Location,
        current: &Location,
        to: &str,
        redirects: &mut usize,
    ) -> RouterResult<Location> {
        *redirects += 1;
        if *redirects > self.max_redirects {
            return Err(RouterError::redirect_loop(format!(
                "more than {} redirects while navigating to {requested}",
                self.max_redirects
            ))
            .in_op_with("navigate", current.to_string()));
        }
        tracing::debug!(target: "router", navigation = %id, from = %current, to, "redirect");
        Location::parse(to).map_err(|e| e.in_op_with("navigate.redirect", current.to_string()))
    }
}

#[cfg(test)]
mod tests;
