//! 视图懒加载
//!
//! 每个视图对应一个延迟工厂，首次激活时才加载，加载结果被缓存。
//! 并发激活共享同一个进行中的加载；失败的结果不缓存，下次激活重试。

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::error::{RouterError, RouterResult};

/// 视图加载失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLoadError {
    message: String,
}

impl ViewLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ViewLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view failed to load: {}", self.message)
    }
}

impl std::error::Error for ViewLoadError {}

/// 延迟视图工厂
pub trait ViewLoader<T> {
    fn load(&self) -> LocalBoxFuture<'static, Result<T, ViewLoadError>>;
}

impl<T, F, Fut> ViewLoader<T> for F
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ViewLoadError>> + 'static,
{
    fn load(&self) -> LocalBoxFuture<'static, Result<T, ViewLoadError>> {
        self().boxed_local()
    }
}

type SharedLoad<T> = Shared<LocalBoxFuture<'static, Result<Rc<T>, ViewLoadError>>>;

enum Slot<T> {
    Idle,
    Loading(SharedLoad<T>),
    Ready(Rc<T>),
}

/// 记忆化的懒加载视图
pub struct LazyView<T> {
    loader: Box<dyn ViewLoader<T>>,
    slot: RefCell<Slot<T>>,
}

impl<T: 'static> LazyView<T> {
    pub fn new(loader: impl ViewLoader<T> + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slot: RefCell::new(Slot::Idle),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Ready(_))
    }

    /// 激活视图：已加载直接返回缓存，否则加入（或发起）加载
    pub async fn get(&self) -> Result<Rc<T>, ViewLoadError> {
        let pending = {
            let mut slot = self.slot.borrow_mut();
            match &*slot {
                Slot::Ready(view) => return Ok(Rc::clone(view)),
                Slot::Loading(pending) => pending.clone(),
                Slot::Idle => {
                    let pending = self
                        .loader
                        .load()
                        .map(|result| result.map(Rc::new))
                        .boxed_local()
                        .shared();
                    *slot = Slot::Loading(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        // 只结算自己参与的那次加载，失败后已有新的加载开始时不覆盖
        let mut slot = self.slot.borrow_mut();
        if matches!(&*slot, Slot::Loading(stored) if stored.ptr_eq(&pending)) {
            *slot = match &result {
                Ok(view) => Slot::Ready(Rc::clone(view)),
                Err(_) => Slot::Idle,
            };
        }
        result
    }
}

/// 视图键到懒加载视图的注册表
pub struct ViewRegistry<K, T> {
    views: HashMap<K, LazyView<T>>,
}

impl<K, T> Default for ViewRegistry<K, T> {
    fn default() -> Self {
        Self {
            views: HashMap::new(),
        }
    }
}

impl<K, T> ViewRegistry<K, T>
where
    K: Hash + Eq + Display,
    T: 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, key: K, loader: impl ViewLoader<T> + 'static) -> Self {
        self.views.insert(key, LazyView::new(loader));
        self
    }

    pub fn contains(&self, key: &K) -> bool {
        self.views.contains_key(key)
    }

    pub fn is_loaded(&self, key: &K) -> bool {
        self.views.get(key).is_some_and(LazyView::is_loaded)
    }

    pub async fn load(&self, key: &K) -> RouterResult<Rc<T>> {
        let view = self.views.get(key).ok_or_else(|| {
            RouterError::view_load(format!("no view registered for {key}")).in_op("views.load")
        })?;

        let loaded = view.get().await.map_err(|e| {
            RouterError::view_load(e.message())
                .with_source(e)
                .in_op_with("views.load", key.to_string())
        })?;

        tracing::debug!(target: "router", view = %key, "view activated");
        Ok(loaded)
    }
}
