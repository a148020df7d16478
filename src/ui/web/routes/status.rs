use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::ui::web::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) async fn api_status(State(state): State<AppState>) -> Json<Value> {
    let ctl = state.controller();
    let binds: Vec<String> = state.bind_addrs.iter().map(|a| a.to_string()).collect();
    Json(json!({
        "version": VERSION,
        "bind_addrs": binds,
        "state": ctl.state().as_str(),
        "result_count": ctl.results().len(),
        "last_query": ctl.last_query().map(|q| q.as_str()),
        "selected_title": ctl.selected().map(|b| b.title.as_str()),
        "loading": ctl.view().loading_visible(),
        "hint_visible": ctl.view().hint_visible(),
    }))
}
