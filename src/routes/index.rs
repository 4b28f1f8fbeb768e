//! Upload form page

use axum::{extract::State, response::Html, routing::get, Router};

use crate::state::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(INDEX_TEMPLATE.replace(
        "{{max_upload_mb}}",
        &state.config().upload.max_megabytes().to_string(),
    ))
}
