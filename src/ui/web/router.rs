use axum::Router;
use axum::extract::connect_info::ConnectInfo;
use axum::http::Request;
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use axum::routing::get;

use tracing::info;

use super::routes;
use super::state::AppState;

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index::index))
        .route("/search", get(routes::search::search_page))
        .route("/details", get(routes::details::details_page))
        .route("/assets/app.css", get(routes::index::asset_css))
        .route("/api/search", get(routes::search::api_search))
        .route("/api/status", get(routes::status::api_status))
        .layer(from_fn(access_log_mw))
        .with_state(state)
}

async fn access_log_mw(req: Request<axum::body::Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().to_string();
    let ip = req
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|c| c.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let resp = next.run(req).await;
    info!(target: "web_access", ip = %ip, method = %method, path = %path, status = %resp.status().as_u16(), "request");
    resp
}
