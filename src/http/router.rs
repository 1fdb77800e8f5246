use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::error::AppError;
use super::handlers;
use super::state::AppState;
use crate::engine::EngineError;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/availability", post(handlers::check_availability))
        .route("/resources", get(handlers::list_resources))
        .route("/resources/{resource_id}/free", get(handlers::free_windows));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// A panicking handler becomes a generic 500; the panic text is logged only.
pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::from(EngineError::Internal(format!("handler panicked: {detail}"))).into_response()
}
