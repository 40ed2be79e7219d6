mod handlers;

use axum::{routing::get, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:exam_id", get(handlers::get_exam))
        .route("/:exam_id/summary", get(handlers::get_exam_summary))
}
