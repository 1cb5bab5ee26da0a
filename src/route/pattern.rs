//! 路径模式解析与匹配
//!
//! 支持三种段：
//! - 静态段 `bookshelf`（大小写不敏感）
//! - 命名参数 `:id` / `{id}`，匹配恰好一个非空段
//! - 兜底段 `:pathMatch(.*)*` / `*`，匹配剩余的零个或多个段，只能位于末尾

use std::cmp::Ordering;
use std::fmt::Display;

use crate::error::{RouterError, RouterResult};

use super::params::{ParamValue, RouteParams};

const CATCH_ALL_SUFFIX: &str = "(.*)*";
const DEFAULT_CATCH_ALL_NAME: &str = "pathMatch";

// 排名分值：静态 > 参数 > 缺失段 > 兜底
const SCORE_STATIC: u8 = 3;
const SCORE_PARAM: u8 = 2;
const SCORE_ABSENT: u8 = 1;
const SCORE_CATCH_ALL: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// 已转为小写的静态段
    Static(String),
    Param(String),
    CatchAll(String),
}

impl Segment {
    fn score(&self) -> u8 {
        match self {
            Segment::Static(_) => SCORE_STATIC,
            Segment::Param(_) => SCORE_PARAM,
            Segment::CatchAll(_) => SCORE_CATCH_ALL,
        }
    }
}

/// 已解析的路径模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> RouterResult<Self> {
        let fail = |msg: String| RouterError::invalid_pattern(msg).in_op_with("pattern.parse", raw);

        if !raw.starts_with('/') {
            return Err(fail("pattern must start with '/'".to_string()));
        }

        let mut segments = Vec::new();
        let parts = split_path(raw);
        let last = parts.len().saturating_sub(1);

        for (i, part) in parts.iter().enumerate() {
            let segment = parse_segment(part).map_err(fail)?;
            if matches!(segment, Segment::CatchAll(_)) && i != last {
                return Err(fail("catch-all segment must be the last one".to_string()));
            }
            if let Segment::Param(name) | Segment::CatchAll(name) = &segment {
                let taken = segments.iter().any(|s| {
                    matches!(s, Segment::Param(n) | Segment::CatchAll(n) if n == name)
                });
                if taken {
                    return Err(fail(format!("parameter '{name}' declared twice")));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll(_)))
    }

    /// 形状键：忽略参数名，用于检测重复模式
    pub fn shape(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Static(s) => out.push_str(s),
                Segment::Param(_) => out.push(':'),
                Segment::CatchAll(_) => out.push('*'),
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }

    /// 匹配一个（保持百分号编码的）路径，成功时返回解码后的参数
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts = split_path(path);
        let mut params = RouteParams::new();
        let mut index = 0;

        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    let part = parts.get(index)?;
                    if !part.eq_ignore_ascii_case(expected) {
                        return None;
                    }
                    index += 1;
                }
                Segment::Param(name) => {
                    let part = parts.get(index)?;
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.as_str(), ParamValue::Single(decode(part)));
                    index += 1;
                }
                Segment::CatchAll(name) => {
                    let rest = parts[index..].iter().map(|p| decode(p)).collect();
                    params.insert(name.as_str(), ParamValue::Repeated(rest));
                    index = parts.len();
                }
            }
        }

        (index == parts.len()).then_some(params)
    }

    /// 反向构造路径，参数值会被百分号编码
    pub fn build(&self, params: &RouteParams) -> RouterResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Static(s) => {
                    out.push('/');
                    out.push_str(s);
                }
                Segment::Param(name) => {
                    let value = params
                        .value(name)
                        .map(ParamValue::joined)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| {
                            RouterError::missing_param(format!("missing parameter '{name}'"))
                                .in_op_with("pattern.build", self.raw.as_str())
                        })?;
                    out.push('/');
                    out.push_str(&urlencoding::encode(&value));
                }
                Segment::CatchAll(name) => match params.value(name) {
                    Some(ParamValue::Repeated(parts)) => {
                        for part in parts {
                            out.push('/');
                            out.push_str(&urlencoding::encode(part));
                        }
                    }
                    Some(ParamValue::Single(value)) => {
                        for part in value.split('/').filter(|p| !p.is_empty()) {
                            out.push('/');
                            out.push_str(&urlencoding::encode(part));
                        }
                    }
                    None => {}
                },
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }

    /// 匹配优先级比较，`Ordering::Less` 表示 `self` 更优先
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let ours = self.segments.get(i).map_or(SCORE_ABSENT, Segment::score);
            let theirs = other.segments.get(i).map_or(SCORE_ABSENT, Segment::score);
            match theirs.cmp(&ours) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// 按 `/` 拆段，忽略前导 `/` 和一个结尾 `/`
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

fn parse_segment(part: &str) -> Result<Segment, String> {
    if part == "*" {
        return Ok(Segment::CatchAll(DEFAULT_CATCH_ALL_NAME.to_string()));
    }

    if let Some(rest) = part.strip_prefix(':') {
        if let Some(name) = rest.strip_suffix(CATCH_ALL_SUFFIX) {
            return valid_name(name).map(Segment::CatchAll);
        }
        return valid_name(rest).map(Segment::Param);
    }

    if let Some(inner) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
        return valid_name(inner).map(Segment::Param);
    }

    if part.is_empty() {
        return Err("empty segment".to_string());
    }
    if part.contains([':', '{', '}', '*', '(', ')', '?', '#']) {
        return Err(format!("unsupported characters in segment '{part}'"));
    }
    Ok(Segment::Static(part.to_ascii_lowercase()))
}

fn valid_name(name: &str) -> Result<String, String> {
    if name.is_empty() {
        return Err("parameter name is empty".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid parameter name '{name}'"));
    }
    Ok(name.to_string())
}

fn decode(part: &str) -> String {
    urlencoding::decode(part)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| part.to_string())
}
