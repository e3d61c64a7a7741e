use std::sync::Arc;

use axum::{Extension, Json, Router, routing::post};

use crate::app::AppHooks;
use crate::app::dto::{AfterCommitResponse, BeforeCommitResponse, SubmissionRequest};

pub fn router() -> Router {
    Router::new()
        .route("/before-commit", post(before_commit))
        .route("/after-commit", post(after_commit))
}

/// A refused commit is still a successful call: the dispatcher reads `allowed`.
pub async fn before_commit(
    Extension(hooks): Extension<Arc<AppHooks>>,
    Json(body): Json<SubmissionRequest>,
) -> Json<BeforeCommitResponse> {
    let decision = hooks.on_before_commit(&body.record).await;
    Json(decision.into())
}

pub async fn after_commit(
    Extension(hooks): Extension<Arc<AppHooks>>,
    Json(body): Json<SubmissionRequest>,
) -> Json<AfterCommitResponse> {
    let outcome = hooks.on_after_commit(&body.record).await;
    Json(outcome.into())
}
