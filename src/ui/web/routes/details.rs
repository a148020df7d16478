use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use tracing::debug;

use crate::book_search::ResultsClick;
use crate::ui::web::routes::index::page_response;
use crate::ui::web::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct DetailParams {
    pub(crate) title: Option<String>,
}

/// 卡片上的「View Details」按钮。没有 `title` 参数视为点在了按钮以外。
pub(crate) async fn details_page(
    State(state): State<AppState>,
    Query(params): Query<DetailParams>,
) -> Response {
    let click = match params.title {
        Some(book_title) => ResultsClick::ViewDetails { book_title },
        None => ResultsClick::Elsewhere,
    };

    let html = {
        let mut ctl = state.controller();
        if !ctl.handle_book_selection(&click) {
            debug!(target: "web", "selection ignored: {click:?}");
        }
        ctl.view().render_document()
    };
    page_response(html)
}
