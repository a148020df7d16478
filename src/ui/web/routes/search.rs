use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::book_search::{SearchError, SearchQuery, SearchResponse};
use crate::ui::web::routes::index::page_response;
use crate::ui::web::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub(crate) q: String,
}

/// 表单提交（按钮或回车）。控制器只在开始/结束时加锁，请求期间不持锁，
/// 因此并发搜索互不阻塞，最后完成的那次决定页面内容。
pub(crate) async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let (query, backend) = {
        let mut ctl = state.controller();
        ctl.view_mut().set_search_input(&params.q);
        (ctl.begin_search(&params.q), ctl.backend())
    };

    if let Some(query) = query {
        let outcome = tokio::task::spawn_blocking(move || backend.search(&query))
            .await
            .unwrap_or_else(|e| Err(SearchError::Task(e.to_string())));
        state.controller().complete_search(outcome);
    }

    let html = state.controller().view().render_document();
    page_response(html)
}

/// 无状态 JSON 接口：不会改动页面上的结果集。
pub(crate) async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, StatusCode> {
    let Some(query) = SearchQuery::parse(&params.q) else {
        return Ok(Json(json!({"num_found": 0, "docs": []})));
    };

    let backend = state.controller().backend();
    let resp: SearchResponse = tokio::task::spawn_blocking(move || backend.search(&query))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|e| {
            warn!(target: "web", "api search failed: {e}");
            StatusCode::BAD_GATEWAY
        })?;

    let num_found = resp.num_found.unwrap_or(resp.docs().len() as u64);
    Ok(Json(json!({
        "num_found": num_found,
        "docs": resp.into_docs(),
    })))
}
