//! Route modules for the PDF/UA server

pub mod convert;
pub mod health;
pub mod index;

use std::any::Any;

use axum::{response::IntoResponse, response::Response, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Build the application router with all routes and error fallbacks
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(index::router())
        .merge(health::router())
        .merge(convert::router(state.clone()))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
