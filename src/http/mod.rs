//! HTTP transport: a thin axum adapter over [`crate::engine::Engine`].
//!
//! Handlers deserialize, call the engine synchronously and map the typed
//! outcome onto a status code. No request state outlives the call.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
