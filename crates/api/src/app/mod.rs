//! HTTP application wiring (Axum router + hooks wiring).
//!
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use stockguard_events::Notifier;
use stockguard_infra::SubmissionHooks;
use stockguard_infra::record_store::RecordStore;

pub mod dto;
pub mod routes;

/// Hooks behind trait objects so the router does not care which store is wired in.
pub type AppHooks = SubmissionHooks<Arc<dyn RecordStore>, Arc<dyn Notifier>>;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(hooks: Arc<AppHooks>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/hooks/orders", routes::hooks::router())
        .layer(Extension(hooks))
}
