//! History 抽象
//!
//! 浏览器实现位于前端 crate；这里提供内存实现和基础路径处理。

/// 导航写入 History 的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// 新增记录
    Push,
    /// 替换当前记录（重定向）
    Replace,
    /// 浏览器前进/后退，记录已由浏览器移动
    Pop,
}

pub trait History {
    /// 当前完整路径（已剥离基础路径）
    fn location(&self) -> String;

    fn push(&mut self, full_path: &str);

    fn replace(&mut self, full_path: &str);
}

/// 规范化基础路径：保证以 `/` 开头，去掉结尾 `/`（根路径除外）
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// 剥离基础路径；不在基础路径下的地址原样返回
pub fn strip_base(base: &str, full_path: &str) -> String {
    let base = normalize_base(base);
    if base == "/" {
        return full_path.to_string();
    }
    match full_path.strip_prefix(base.as_str()) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with(['/', '?', '#']) => {
            if rest.starts_with('/') {
                rest.to_string()
            } else {
                format!("/{rest}")
            }
        }
        _ => full_path.to_string(),
    }
}

/// 补回基础路径
pub fn with_base(base: &str, full_path: &str) -> String {
    let base = normalize_base(base);
    if base == "/" {
        full_path.to_string()
    } else if full_path == "/" {
        base
    } else {
        format!("{base}{full_path}")
    }
}

/// 内存 History，支持前进/后退
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 后退一步，已在最早记录时返回 false
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push(&mut self, full_path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(full_path.to_string());
        self.index += 1;
    }

    fn replace(&mut self, full_path: &str) {
        self.entries[self.index] = full_path.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(""), "/");
        assert_eq!(normalize_base("/"), "/");
        assert_eq!(normalize_base("/app/"), "/app");
        assert_eq!(normalize_base("app"), "/app");
    }

    #[test]
    fn test_strip_and_join_base() {
        assert_eq!(strip_base("/app/", "/app/reader/1"), "/reader/1");
        assert_eq!(strip_base("/app", "/app"), "/");
        assert_eq!(strip_base("/app", "/app?x=1"), "/?x=1");
        assert_eq!(strip_base("/app", "/application"), "/application");
        assert_eq!(strip_base("/", "/bookshelf"), "/bookshelf");

        assert_eq!(with_base("/app", "/reader/1"), "/app/reader/1");
        assert_eq!(with_base("/app", "/"), "/app");
        assert_eq!(with_base("/", "/login"), "/login");
    }

    #[test]
    fn test_memory_history_push_truncates_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push("/bookshelf");
        history.push("/reader/1");
        assert!(history.back());
        assert_eq!(history.location(), "/bookshelf");

        history.push("/vocabulary");
        assert!(!history.forward());
        assert_eq!(history.entries(), &["/", "/bookshelf", "/vocabulary"]);

        history.replace("/review");
        assert_eq!(history.location(), "/review");
        assert!(history.back() && history.back());
        assert!(!history.back());
    }
}
