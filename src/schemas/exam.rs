use serde::{Deserialize, Serialize};

use crate::db::types::{ModuleDifficulty, ModuleType, QuestionType};
use crate::services::exam_summary::ExamSummary;

#[derive(Debug, Serialize)]
pub(crate) struct ExamSummaryResponse {
    pub(crate) exam_id: String,
    pub(crate) total_questions: i64,
    pub(crate) duration_minutes: i64,
    pub(crate) module_count: i64,
    pub(crate) section_count: i64,
}

impl ExamSummaryResponse {
    pub(crate) fn from_summary(exam_id: String, summary: ExamSummary) -> Self {
        Self {
            exam_id,
            total_questions: summary.total_questions,
            duration_minutes: summary.duration_minutes,
            module_count: summary.module_count,
            section_count: summary.section_count,
        }
    }
}

/// Delivery view query: the adaptive variant chosen by upstream routing.
#[derive(Debug, Deserialize)]
pub(crate) struct ExamDetailQuery {
    #[serde(default)]
    pub(crate) difficulty: Option<ModuleDifficulty>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) program: String,
    pub(crate) is_practice: bool,
    pub(crate) time_limit_minutes: Option<i64>,
    pub(crate) sections: Vec<SectionResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SectionResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) position: i32,
    pub(crate) modules: Vec<ModuleResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleResponse {
    pub(crate) id: String,
    pub(crate) module_type: ModuleType,
    pub(crate) difficulty: Option<ModuleDifficulty>,
    pub(crate) time_limit_minutes: Option<i64>,
    pub(crate) position: i32,
    pub(crate) questions: Vec<QuestionResponse>,
}

/// Student-safe question view; correct-answer data never leaves the server.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) question_id: String,
    pub(crate) order: i32,
    pub(crate) question_type: QuestionType,
    pub(crate) prompt: String,
    pub(crate) options: Vec<AnswerOptionResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerOptionResponse {
    pub(crate) id: String,
    pub(crate) text: String,
}
