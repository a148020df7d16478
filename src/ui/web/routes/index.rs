use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};

use crate::ui::web::state::AppState;
use crate::ui::web::templates;

pub(crate) async fn index(State(state): State<AppState>) -> Response {
    let html = state.controller().view().render_document();
    page_response(html)
}

/// 页面每次都是当前状态的快照，禁止浏览器缓存。
pub(crate) fn page_response(html: String) -> Response {
    no_store(Html(html).into_response())
}

pub(crate) async fn asset_css() -> Response {
    let mut resp = templates::APP_CSS.into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/css; charset=utf-8"),
    );
    no_store(resp)
}

fn no_store(mut resp: Response) -> Response {
    let headers = resp.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    resp
}
