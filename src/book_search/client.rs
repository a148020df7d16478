//! Open Library 搜索客户端。
//!
//! 只发一次 GET，不重试、不缓存；非 2xx 视为失败。

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;
use tracing::debug;

use super::models::{SearchQuery, SearchResponse};
use crate::base_system::context::Config;

pub const DEFAULT_SEARCH_API_URL: &str = "https://openlibrary.org/search.json";
pub const DEFAULT_COVER_API_URL: &str = "https://covers.openlibrary.org/b/id";

/// 请求的字段集合（固定）。
pub const SEARCH_FIELDS: &str = "title,cover_i,author_name,first_publish_year,subject,author_key";

const COVER_SIZE_SUFFIX: &str = "-L.jpg";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("http client init failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Network response was not ok (HTTP {0})")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("search task failed: {0}")]
    Task(String),
}

/// 搜索后端接缝：生产环境走 HTTP，测试里换成内存实现。
pub trait SearchBackend: Send + Sync {
    fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError>;
}

/// `<base>?title=<query>&fields=<SEARCH_FIELDS>`，按表单规则编码。
pub fn build_search_url(base: &str, query: &SearchQuery) -> Result<Url, SearchError> {
    Url::parse_with_params(
        base.trim(),
        &[("title", query.as_str()), ("fields", SEARCH_FIELDS)],
    )
    .map_err(|e| SearchError::InvalidEndpoint(format!("{base}: {e}")))
}

/// 大尺寸封面地址：`<base>/<id>-L.jpg`。
pub fn cover_url(base: &str, cover_id: i64) -> String {
    format!(
        "{}/{}{}",
        base.trim().trim_end_matches('/'),
        cover_id,
        COVER_SIZE_SUFFIX
    )
}

pub struct OpenLibraryClient {
    client: Client,
    search_api_url: String,
}

impl OpenLibraryClient {
    pub fn new(search_api_url: &str, user_agent: &str, timeout: Option<Duration>) -> Result<Self, SearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or(HeaderValue::from_static("openlibrary-search")),
        );

        // blocking 客户端默认 30s 超时；未配置时传 None 显式关闭。
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(SearchError::Client)?;
        Ok(Self {
            client,
            search_api_url: search_api_url.trim().to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::new(
            &config.search_api_url,
            &config.user_agent,
            config.request_timeout_duration(),
        )
    }
}

impl SearchBackend for OpenLibraryClient {
    fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let url = build_search_url(&self.search_api_url, query)?;
        debug!(target: "search", "GET {url}");

        let resp = self.client.get(url).send()?;
        let status = resp.status();
        debug!(target: "search", "search response status: {}", status.as_u16());
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = resp.text()?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}
