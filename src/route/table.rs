use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{RouterError, RouterResult};
use crate::location::Location;

use super::meta::RouteMeta;
use super::params::RouteParams;
use super::pattern::PathPattern;

/// 路由的去向：渲染视图，或直接重定向
#[derive(Debug, Clone, PartialEq)]
pub enum RouteTarget<V> {
    View(V),
    Redirect(String),
}

/// 单条路由声明
#[derive(Debug, Clone)]
pub struct RouteDef<V> {
    path: String,
    name: Option<String>,
    target: RouteTarget<V>,
    meta: RouteMeta,
}

impl<V> RouteDef<V> {
    pub fn view(path: impl Into<String>, view: V) -> Self {
        Self {
            path: path.into(),
            name: None,
            target: RouteTarget::View(view),
            meta: RouteMeta::default(),
        }
    }

    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            target: RouteTarget::Redirect(to.into()),
            meta: RouteMeta::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.meta.requires_auth = true;
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// 已注册的路由记录（路由表构建后不可变）
#[derive(Debug)]
pub struct RouteRecord<V> {
    pub name: Option<String>,
    pub pattern: PathPattern,
    pub target: RouteTarget<V>,
    pub meta: RouteMeta,
}

/// 一次路由解析的结果
#[derive(Debug)]
pub struct RouteMatch<V> {
    record: Arc<RouteRecord<V>>,
    params: RouteParams,
    location: Location,
}

// 手写 Clone，避免给 V 加 Clone 约束
impl<V> Clone for RouteMatch<V> {
    fn clone(&self) -> Self {
        Self {
            record: Arc::clone(&self.record),
            params: self.params.clone(),
            location: self.location.clone(),
        }
    }
}

impl<V> PartialEq for RouteMatch<V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
            && self.params == other.params
            && self.location == other.location
    }
}

impl<V> RouteMatch<V> {
    pub fn record(&self) -> &RouteRecord<V> {
        &self.record
    }

    pub fn name(&self) -> Option<&str> {
        self.record.name.as_deref()
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.record.meta
    }

    pub fn requires_auth(&self) -> bool {
        self.record.meta.requires_auth
    }

    /// 目标视图；重定向路由返回 None
    pub fn view(&self) -> Option<&V> {
        match &self.record.target {
            RouteTarget::View(view) => Some(view),
            RouteTarget::Redirect(_) => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match &self.record.target {
            RouteTarget::Redirect(to) => Some(to),
            RouteTarget::View(_) => None,
        }
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// 路由表
///
/// 启动时构建一次，之后只读。解析时按排名顺序遍历，首个完整匹配胜出。
#[derive(Debug)]
pub struct RouteTable<V> {
    records: Vec<Arc<RouteRecord<V>>>,
    ranked: Vec<usize>,
}

impl<V> RouteTable<V> {
    pub fn builder() -> RouteTableBuilder<V> {
        RouteTableBuilder { defs: Vec::new() }
    }

    /// 按注册顺序遍历
    pub fn records(&self) -> impl Iterator<Item = &RouteRecord<V>> {
        self.records.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn resolve(&self, location: &Location) -> Option<RouteMatch<V>> {
        self.ranked.iter().find_map(|&index| {
            let record = &self.records[index];
            record.pattern.matches(location.path()).map(|params| RouteMatch {
                record: Arc::clone(record),
                params,
                location: location.clone(),
            })
        })
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RouteRecord<V>> {
        self.records()
            .find(|record| record.name.as_deref() == Some(name))
    }

    /// 按路由名构造路径
    pub fn path_for(&self, name: &str, params: &RouteParams) -> RouterResult<String> {
        let record = self.find_by_name(name).ok_or_else(|| {
            RouterError::unknown_route_name(format!("no route named '{name}'"))
                .in_op("table.path_for")
        })?;
        record
            .pattern
            .build(params)
            .map_err(|e| e.in_op_with("table.path_for", name))
    }
}

pub struct RouteTableBuilder<V> {
    defs: Vec<RouteDef<V>>,
}

impl<V> RouteTableBuilder<V> {
    pub fn route(mut self, def: RouteDef<V>) -> Self {
        self.defs.push(def);
        self
    }

    /// 校验并构建路由表
    ///
    /// - 模式形状唯一，路由名唯一
    /// - 重定向目标必须能被本表解析
    pub fn build(self) -> RouterResult<RouteTable<V>> {
        let mut shapes = HashSet::new();
        let mut names = HashSet::new();
        let mut records = Vec::with_capacity(self.defs.len());

        for def in self.defs {
            let pattern =
                PathPattern::parse(&def.path).map_err(|e| e.in_op("table.build"))?;

            if !shapes.insert(pattern.shape()) {
                return Err(RouterError::duplicate_route(format!(
                    "path pattern '{}' is registered twice",
                    def.path
                ))
                .in_op("table.build"));
            }
            if let Some(name) = &def.name {
                if !names.insert(name.clone()) {
                    return Err(RouterError::duplicate_route(format!(
                        "route name '{name}' is registered twice"
                    ))
                    .in_op("table.build"));
                }
            }

            records.push(Arc::new(RouteRecord {
                name: def.name,
                pattern,
                target: def.target,
                meta: def.meta,
            }));
        }

        let mut ranked: Vec<usize> = (0..records.len()).collect();
        ranked.sort_by(|&a, &b| records[a].pattern.rank_cmp(&records[b].pattern));

        let table = RouteTable { records, ranked };
        table.check_redirects()?;
        Ok(table)
    }
}

impl<V> RouteTable<V> {
    fn check_redirects(&self) -> RouterResult<()> {
        for record in &self.records {
            if let RouteTarget::Redirect(to) = &record.target {
                let location = Location::parse(to)
                    .map_err(|e| e.in_op_with("table.build", record.pattern.as_str()))?;
                if self.resolve(&location).is_none() {
                    return Err(RouterError::no_match(format!(
                        "redirect target '{to}' of '{}' matches no route",
                        record.pattern
                    ))
                    .in_op("table.build"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterErrorKind;

    fn loc(raw: &str) -> Location {
        Location::parse(raw).unwrap()
    }

    fn sample() -> RouteTable<&'static str> {
        RouteTable::builder()
            .route(RouteDef::redirect("/:pathMatch(.*)*", "/"))
            .route(RouteDef::view("/", "home").named("Home"))
            .route(RouteDef::view("/reader/:id", "reader").named("Reader").requires_auth())
            .route(RouteDef::view("/reader/latest", "latest").named("Latest"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_prefers_static_over_param() {
        let table = sample();
        assert_eq!(table.resolve(&loc("/reader/latest")).unwrap().view(), Some(&"latest"));

        let m = table.resolve(&loc("/reader/7")).unwrap();
        assert_eq!(m.view(), Some(&"reader"));
        assert_eq!(m.param("id"), Some("7"));
        assert!(m.requires_auth());
        assert_eq!(m.name(), Some("Reader"));
    }

    #[test]
    fn test_catch_all_is_lowest_priority() {
        let table = sample();
        assert_eq!(table.resolve(&loc("/")).unwrap().view(), Some(&"home"));

        let m = table.resolve(&loc("/does/not/exist")).unwrap();
        assert_eq!(m.redirect_target(), Some("/"));
        assert_eq!(m.view(), None);
        assert!(!m.requires_auth());
    }

    #[test]
    fn test_resolve_without_catch_all() {
        let table = RouteTable::builder()
            .route(RouteDef::view("/", 1))
            .build()
            .unwrap();
        assert!(table.resolve(&loc("/missing")).is_none());
    }

    #[test]
    fn test_duplicate_shapes_and_names_rejected() {
        let err = RouteTable::builder()
            .route(RouteDef::view("/reader/:id", 1))
            .route(RouteDef::view("/Reader/:book", 2))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::DuplicateRoute);

        let err = RouteTable::builder()
            .route(RouteDef::view("/a", 1).named("Same"))
            .route(RouteDef::view("/b", 2).named("Same"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::DuplicateRoute);
    }

    #[test]
    fn test_redirect_target_must_resolve() {
        let err = RouteTable::builder()
            .route(RouteDef::<u8>::redirect("/old", "/new"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::NoMatch);

        let err = RouteTable::builder()
            .route(RouteDef::<u8>::redirect("/old", "relative"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::InvalidLocation);
    }

    #[test]
    fn test_path_for() {
        let table = sample();
        let path = table
            .path_for("Reader", &RouteParams::new().with("id", "42"))
            .unwrap();
        assert_eq!(path, "/reader/42");

        let err = table.path_for("Nope", &RouteParams::new()).unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::UnknownRouteName);

        let err = table.path_for("Reader", &RouteParams::new()).unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::MissingParam);
    }
}
