//! 路由运行时配置
//!
//! 默认值集中在常量里；宿主可以从 JSON 或变量表（构建期环境变量等）覆盖。

use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

/// 这些是默认值，变量表或 JSON 中没有定义时使用
const DEFAULT_BASE: &str = "/";
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_SESSION_KEY: &str = "isAuthenticated";
const DEFAULT_MAX_REDIRECTS: usize = 8;

const VAR_BASE: &str = "BASE_URL";
const VAR_LOGIN_PATH: &str = "LOGIN_PATH";
const VAR_SESSION_KEY: &str = "SESSION_KEY";
const VAR_MAX_REDIRECTS: &str = "MAX_REDIRECTS";

/// 路由配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// History 基础路径，读取时剥离、写入时补回
    pub base: String,
    /// 认证失败时的重定向目标
    pub login_path: String,
    /// 会话标记在持久化存储中的键
    pub session_key: String,
    /// 单次导航允许的最大重定向次数
    pub max_redirects: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl RouterConfig {
    /// 从变量表读取配置，读不到的项使用默认值
    ///
    /// `lookup` 通常包装构建期环境变量，测试中可以直接传入闭包。
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> RouterResult<Self> {
        let defaults = Self::default();
        let max_redirects = match lookup(VAR_MAX_REDIRECTS) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                RouterError::config(format!("{VAR_MAX_REDIRECTS} is not a number: {raw}"))
                    .with_source(e)
            })?,
            None => defaults.max_redirects,
        };

        let config = Self {
            base: lookup(VAR_BASE).unwrap_or(defaults.base),
            login_path: lookup(VAR_LOGIN_PATH).unwrap_or(defaults.login_path),
            session_key: lookup(VAR_SESSION_KEY).unwrap_or(defaults.session_key),
            max_redirects,
        };
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 字符串读取配置，缺失字段使用默认值
    pub fn from_json(raw: &str) -> RouterResult<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| RouterError::from(e).in_op("config.from_json"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RouterResult<()> {
        if !self.base.starts_with('/') {
            return Err(RouterError::config(format!(
                "base must start with '/': {}",
                self.base
            )));
        }
        if !self.login_path.starts_with('/') {
            return Err(RouterError::config(format!(
                "login path must start with '/': {}",
                self.login_path
            )));
        }
        if self.session_key.trim().is_empty() {
            return Err(RouterError::config("session key must not be empty"));
        }
        if self.max_redirects == 0 {
            return Err(RouterError::config("max redirects must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterErrorKind;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.base, "/");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.session_key, "isAuthenticated");
        assert_eq!(config.max_redirects, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_vars_overrides_and_defaults() {
        let vars: HashMap<&str, &str> = [("BASE_URL", "/app"), ("MAX_REDIRECTS", " 3 ")].into();
        let config = RouterConfig::from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base, "/app");
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn test_from_vars_rejects_bad_number() {
        let err = RouterConfig::from_vars(|k| (k == "MAX_REDIRECTS").then(|| "many".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::Config);
    }

    #[test]
    fn test_from_json_partial() {
        let config = RouterConfig::from_json(r#"{ "loginPath": "/sign-in" }"#).unwrap();
        assert_eq!(config.login_path, "/sign-in");
        assert_eq!(config.session_key, "isAuthenticated");
    }

    #[test]
    fn test_from_json_validation() {
        let err = RouterConfig::from_json(r#"{ "maxRedirects": 0 }"#).unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::Config);

        let err = RouterConfig::from_json(r#"{ "loginPath": "login" }"#).unwrap_err();
        assert_eq!(err.kind(), RouterErrorKind::Config);

        let err = RouterConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
