//! 全局配置结构（Config）与默认值。
//!
//! 该模块同时提供生成 `config.yml` 的字段元信息。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::{ConfigError, ConfigSpec, FieldMeta};
use crate::book_search::client::{DEFAULT_COVER_API_URL, DEFAULT_SEARCH_API_URL};

pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:18424";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // 程序配置
    #[serde(default = "default_false")]
    pub old_cli: bool,

    // 接口配置
    #[serde(default = "default_search_api_url")]
    pub search_api_url: String,
    #[serde(default = "default_cover_api_url")]
    pub cover_api_url: String,

    // 网络配置
    #[serde(default)]
    pub request_timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // Web UI
    #[serde(default = "default_web_addr")]
    pub web_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            old_cli: default_false(),
            search_api_url: default_search_api_url(),
            cover_api_url: default_cover_api_url(),
            request_timeout: 0,
            user_agent: default_user_agent(),
            web_addr: default_web_addr(),
        }
    }
}

impl Config {
    /// `request_timeout` 为 0 表示不设超时。
    pub fn request_timeout_duration(&self) -> Option<Duration> {
        (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout))
    }
}

impl ConfigSpec for Config {
    const FILE_NAME: &'static str = "config.yml";

    fn fields() -> &'static [FieldMeta] {
        static FIELDS: [FieldMeta; 6] = [
            FieldMeta {
                name: "old_cli",
                description: "是否使用老版本命令行界面（不进入 TUI）",
            },
            FieldMeta {
                name: "search_api_url",
                description: "书目搜索接口地址（Open Library search.json）",
            },
            FieldMeta {
                name: "cover_api_url",
                description: "封面图片接口前缀，最终地址为 <前缀>/<cover_i>-L.jpg",
            },
            FieldMeta {
                name: "request_timeout",
                description: "请求超时时间（秒），0 表示不限制",
            },
            FieldMeta {
                name: "user_agent",
                description: "请求时携带的 User-Agent",
            },
            FieldMeta {
                name: "web_addr",
                description: "Web UI 监听地址，多个地址用逗号分隔\n环境变量 BOOK_SEARCH_WEB_ADDR 优先",
            },
        ];
        &FIELDS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("search_api_url", &self.search_api_url),
            ("cover_api_url", &self.cover_api_url),
        ] {
            let u = url.trim();
            if !(u.starts_with("http://") || u.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be an http(s) url, got '{u}'"
                )));
            }
        }
        Ok(())
    }
}

fn default_false() -> bool {
    false
}

fn default_search_api_url() -> String {
    DEFAULT_SEARCH_API_URL.to_string()
}

fn default_cover_api_url() -> String {
    DEFAULT_COVER_API_URL.to_string()
}

fn default_user_agent() -> String {
    format!("openlibrary-search/{}", env!("CARGO_PKG_VERSION"))
}

fn default_web_addr() -> String {
    DEFAULT_WEB_ADDR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_zero_means_none() {
        let mut cfg = Config::default();
        assert_eq!(cfg.request_timeout_duration(), None);
        cfg.request_timeout = 5;
        assert_eq!(cfg.request_timeout_duration(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn every_field_has_metadata() {
        let value = serde_yaml::to_value(Config::default()).expect("serialize");
        let serde_yaml::Value::Mapping(map) = value else {
            panic!("config must be a mapping");
        };
        assert_eq!(map.len(), Config::fields().len());
    }
}
