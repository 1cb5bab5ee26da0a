use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// =========================================================
// 错误类型枚举
// =========================================================

/// 路由错误类型
/// 每个变体对应一个稳定的机器可读错误代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouterErrorKind {
    /// 路径模式语法错误 (如 `reader/:id` 缺少前导 `/`)
    InvalidPattern,
    /// 路由表中存在重复的路径模式或路由名
    DuplicateRoute,
    /// 无法解析的导航目标 (如相对路径)
    InvalidLocation,
    /// 没有任何路由匹配目标路径 (路由表缺少兜底路由时才会出现)
    NoMatch,
    /// 构造路径时缺少必需参数
    MissingParam,
    /// 按名称导航时路由名不存在
    UnknownRouteName,
    /// 重定向次数超过上限
    RedirectLoop,
    /// 视图懒加载失败
    ViewLoad,
    /// 配置无效或无法解析
    Config,
}

impl RouterErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            RouterErrorKind::InvalidPattern => "INVALID_PATTERN",
            RouterErrorKind::DuplicateRoute => "DUPLICATE_ROUTE",
            RouterErrorKind::InvalidLocation => "INVALID_LOCATION",
            RouterErrorKind::NoMatch => "NO_MATCH",
            RouterErrorKind::MissingParam => "MISSING_PARAM",
            RouterErrorKind::UnknownRouteName => "UNKNOWN_ROUTE_NAME",
            RouterErrorKind::RedirectLoop => "REDIRECT_LOOP",
            RouterErrorKind::ViewLoad => "VIEW_LOAD_FAILED",
            RouterErrorKind::Config => "INVALID_CONFIG",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 操作名称，如 "table.build", "navigate"
    pub operation: String,
    /// 额外的细节信息，如路径、路由名等
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// Router Domain Errors
///
/// - kind: 错误类型/语义
/// - message: 错误消息
/// - source: 原始错误（可选，用于错误链）
/// - spans: 结构化的调用追踪栈
///
/// 可 Clone，以便随懒加载结果在多个等待者之间共享。
#[derive(Debug, Clone)]
pub struct RouterError {
    kind: RouterErrorKind,
    message: String,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl RouterError {
    pub fn new(kind: RouterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::InvalidPattern, message)
    }

    pub fn duplicate_route(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::DuplicateRoute, message)
    }

    pub fn invalid_location(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::InvalidLocation, message)
    }

    pub fn no_match(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::NoMatch, message)
    }

    pub fn missing_param(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::MissingParam, message)
    }

    pub fn unknown_route_name(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::UnknownRouteName, message)
    }

    pub fn redirect_loop(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::RedirectLoop, message)
    }

    pub fn view_load(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::ViewLoad, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(RouterErrorKind::Config, message)
    }

    // --- Context builders (Builder Pattern) ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    // --- Accessors ---

    pub fn kind(&self) -> RouterErrorKind {
        self.kind
    }

    /// 获取机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取操作追踪栈
    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type RouterResult<T> = std::result::Result<T, RouterError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for RouterError {
    fn from(e: serde_json::Error) -> Self {
        RouterError::config(e.to_string()).with_source(e)
    }
}

impl From<url::ParseError> for RouterError {
    fn from(e: url::ParseError) -> Self {
        RouterError::invalid_location(e.to_string()).with_source(e)
    }
}
