//! 路由服务
//!
//! 把导航器、History 与会话来源组合在一起：
//! 所有对 History 的写入都集中在这里。

use std::rc::Rc;

use crate::error::RouterResult;
use crate::guard::GuardContext;
use crate::history::{History, HistoryMode};
use crate::navigation::{NavigationOutcome, Navigator};
use crate::route::{RouteMatch, RouteParams};
use crate::session::SessionSource;

pub struct HistoryRouter<V, H> {
    navigator: Navigator<V>,
    history: H,
    session: Rc<dyn SessionSource>,
    current: Option<RouteMatch<V>>,
}

impl<V, H: History> HistoryRouter<V, H> {
    /// # Arguments
    /// * `session` - 认证状态来源，由外部注入实现解耦
    pub fn new(navigator: Navigator<V>, history: H, session: Rc<dyn SessionSource>) -> Self {
        Self {
            navigator,
            history,
            session,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&RouteMatch<V>> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn navigator(&self) -> &Navigator<V> {
        &self.navigator
    }

    /// 根据 History 中的初始地址完成首次导航
    pub fn start(&mut self) -> RouterResult<NavigationOutcome<V>> {
        let initial = self.history.location();
        self.perform(&initial, HistoryMode::Replace, true)
    }

    pub fn push(&mut self, target: &str) -> RouterResult<NavigationOutcome<V>> {
        self.perform(target, HistoryMode::Push, false)
    }

    pub fn replace(&mut self, target: &str) -> RouterResult<NavigationOutcome<V>> {
        self.perform(target, HistoryMode::Replace, false)
    }

    /// 按路由名导航
    pub fn push_named(
        &mut self,
        name: &str,
        params: &RouteParams,
    ) -> RouterResult<NavigationOutcome<V>> {
        let path = self.navigator.path_for(name, params)?;
        self.push(&path)
    }

    /// 浏览器前进/后退后调用：History 已经移动，守卫照常执行
    pub fn sync_with_history(&mut self) -> RouterResult<NavigationOutcome<V>> {
        let target = self.history.location();
        self.perform(&target, HistoryMode::Pop, false)
    }

    /// 认证状态变化后重新校验当前路由
    ///
    /// 例如在受保护页面注销时会被重定向到登录页。
    pub fn revalidate(&mut self) -> RouterResult<NavigationOutcome<V>> {
        let Some(current) = self.current.as_ref() else {
            return self.start();
        };
        let target = current.location().full_path();
        self.perform(&target, HistoryMode::Replace, true)
    }

    fn perform(
        &mut self,
        target: &str,
        mode: HistoryMode,
        force: bool,
    ) -> RouterResult<NavigationOutcome<V>> {
        // 每次导航只读取一次会话标记
        let ctx = GuardContext::new(self.session.auth_state());
        let outcome = self
            .navigator
            .navigate(target, self.current.as_ref(), &ctx, force)?;

        match &outcome {
            NavigationOutcome::Completed(navigation) => {
                let full_path = navigation.to.location().full_path();
                match mode {
                    HistoryMode::Push => self.history.push(&full_path),
                    HistoryMode::Replace if force && !navigation.was_redirected() => {
                        // 地址未变，只需保证 History 与解析结果一致
                        if self.history.location() != full_path {
                            self.history.replace(&full_path);
                        }
                    }
                    HistoryMode::Replace => self.history.replace(&full_path),
                    HistoryMode::Pop if navigation.was_redirected() => {
                        self.history.replace(&full_path)
                    }
                    HistoryMode::Pop => {}
                }
                self.current = Some(navigation.to.clone());
            }
            // 浏览器已经移动：被拒绝，或被重定向回当前路由时，把地址栏恢复到当前路由
            NavigationOutcome::Aborted { .. } | NavigationOutcome::Duplicated
                if mode == HistoryMode::Pop =>
            {
                if let Some(current) = &self.current {
                    let full_path = current.location().full_path();
                    if self.history.location() != full_path {
                        self.history.replace(&full_path);
                    }
                }
            }
            NavigationOutcome::Aborted { .. } | NavigationOutcome::Duplicated => {}
        }

        Ok(outcome)
    }
}
