//! Open Library 搜索接口的数据模型。
//!
//! 字段直接对应 `search.json` 的返回结构，不做本地校验/归一化，
//! 缺失字段留给渲染层做兜底格式化。

use serde::{Deserialize, Deserializer, Serialize};

/// 用户输入的查询词（已 trim，且非空）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// 空串或纯空白返回 `None`。
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `docs` 中的单条书目。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_key: Option<Vec<String>>,
}

impl BookRecord {
    /// 封面 ID；0 与负数视为没有封面。
    pub fn cover_id(&self) -> Option<i64> {
        self.cover_i.filter(|id| *id > 0)
    }
}

/// `null` 与缺失同样处理为默认值。
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `search.json` 的顶层响应。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Option<Vec<BookRecord>>,
    #[serde(default, rename = "numFound", alias = "num_found")]
    pub num_found: Option<u64>,
}

impl SearchResponse {
    pub fn docs(&self) -> &[BookRecord] {
        self.docs.as_deref().unwrap_or(&[])
    }

    pub fn into_docs(self) -> Vec<BookRecord> {
        self.docs.unwrap_or_default()
    }
}
