use serde::Serialize;

/// 单个路由参数的取值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `:id` 这类单段参数
    Single(String),
    /// 兜底参数，按段拆分
    Repeated(Vec<String>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::Repeated(_) => None,
        }
    }

    /// 以 `/` 拼接的形式返回，单段参数原样返回
    pub fn joined(&self) -> String {
        match self {
            ParamValue::Single(value) => value.clone(),
            ParamValue::Repeated(parts) => parts.join("/"),
        }
    }
}

/// 路由参数集合（保持模式中的声明顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    entries: Vec<(String, ParamValue)>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加单段参数，主要用于按名称导航
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, ParamValue::Single(value.into()));
        self
    }

    /// 同名参数会被覆盖
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// 读取单段参数
    pub fn get(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(ParamValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
