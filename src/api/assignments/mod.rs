mod handlers;
mod helpers;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/exams/:exam_id", get(handlers::get_assignment))
        .route("/exams/:exam_id/answers", get(handlers::get_saved_answers))
        .route("/exams/:exam_id/answers/:question_id", put(handlers::save_answer))
        .route("/exams/:exam_id/complete", post(handlers::complete_assignment))
        .route("/exams/:exam_id/retake", post(handlers::retake_assignment))
}
