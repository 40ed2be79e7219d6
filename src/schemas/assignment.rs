use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub(crate) use crate::core::time::format_primitive;
use crate::db::types::AssignmentStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SaveAnswerRequest {
    /// Raw submitted value: an option id or free text. Blank means "cleared".
    #[validate(length(max = 8192, message = "answer must be at most 8192 characters"))]
    pub(crate) answer: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveAnswerResponse {
    pub(crate) question_id: String,
    pub(crate) status: AssignmentStatus,
    pub(crate) saved_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SavedAnswersResponse {
    pub(crate) answers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) student_id: String,
    pub(crate) status: AssignmentStatus,
    pub(crate) started_at: Option<String>,
    pub(crate) completed_at: Option<String>,
    pub(crate) score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionResponse {
    pub(crate) score: Option<f64>,
    pub(crate) correct_answers: i64,
    pub(crate) scored_questions: i64,
    pub(crate) answered_questions: i64,
    pub(crate) total_questions: i64,
    pub(crate) manually_graded: bool,
    pub(crate) completed_at: String,
}
