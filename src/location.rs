//! 导航目标位置
//!
//! 把 `/reader/42?page=3#note` 这样的完整路径拆成 path / query / hash。

use std::fmt::Display;

use serde::Serialize;
use url::Url;

use crate::error::{RouterError, RouterResult};

/// 仅用于借助 `url` 做规范化解析的占位来源
const PARSE_ORIGIN: &str = "http://localhost";

/// 已解析的导航位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
    hash: Option<String>,
}

impl Location {
    /// 解析完整路径
    ///
    /// 只接受以 `/` 开头的绝对路径；`.` / `..` 段会被规范化，
    /// 非 ASCII 字符会被百分号编码。
    pub fn parse(raw: &str) -> RouterResult<Self> {
        if !raw.starts_with('/') || raw.starts_with("//") {
            return Err(RouterError::invalid_location(format!(
                "navigation target must be an absolute path: {raw}"
            )));
        }

        let url = Url::parse(&format!("{PARSE_ORIGIN}{raw}"))
            .map_err(|e| RouterError::from(e).in_op_with("location.parse", raw))?;

        Ok(Self {
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
            hash: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
        })
    }

    /// 路径部分（保持百分号编码）
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// 获取第一个同名查询参数
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// 重新拼出完整路径，用于写入 History
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            out.push('?');
            out.push_str(&query);
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterErrorKind;

    #[test]
    fn test_parse_path_query_hash() {
        let loc = Location::parse("/search?q=apple&page=2#top").unwrap();
        assert_eq!(loc.path(), "/search");
        assert_eq!(loc.query("q"), Some("apple"));
        assert_eq!(loc.query("page"), Some("2"));
        assert_eq!(loc.query("missing"), None);
        assert_eq!(loc.hash(), Some("top"));
        assert_eq!(loc.full_path(), "/search?q=apple&page=2#top");
    }

    #[test]
    fn test_parse_normalizes_dot_segments() {
        let loc = Location::parse("/reader/../bookshelf").unwrap();
        assert_eq!(loc.path(), "/bookshelf");
        assert_eq!(loc.to_string(), "/bookshelf");
    }

    #[test]
    fn test_parse_encodes_non_ascii() {
        let loc = Location::parse("/dictionary/café").unwrap();
        assert_eq!(loc.path(), "/dictionary/caf%C3%A9");
    }

    #[test]
    fn test_rejects_relative_targets() {
        for raw in ["bookshelf", "", "//evil.example/path"] {
            let err = Location::parse(raw).unwrap_err();
            assert_eq!(err.kind(), RouterErrorKind::InvalidLocation, "{raw}");
        }
    }
}
