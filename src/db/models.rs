use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{AssignmentStatus, ModuleDifficulty, ModuleType};

/// Catalog exam. Authored externally; never mutated during delivery.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) program: String,
    /// Exam-level fallback time limit, raw authored value (unit resolved at
    /// read time, see the structure resolver).
    pub(crate) time_limit: Option<i32>,
    pub(crate) is_practice: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamSection {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) title: String,
    pub(crate) position: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamModule {
    pub(crate) id: String,
    pub(crate) section_id: String,
    pub(crate) module_type: ModuleType,
    /// Set only for adaptive modules; NULL for routing/plain.
    pub(crate) difficulty: Option<ModuleDifficulty>,
    pub(crate) time_limit: Option<i32>,
    pub(crate) position: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamQuestion {
    pub(crate) id: String,
    pub(crate) module_id: String,
    pub(crate) question_id: String,
    pub(crate) order_index: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

/// One entry of a multiple-choice option set, stored as jsonb on the bank
/// item. The id is what students submit and what scoring compares against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AnswerOption {
    pub(crate) id: String,
    pub(crate) text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamAssignment {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) student_id: String,
    pub(crate) status: AssignmentStatus,
    pub(crate) started_at: Option<PrimitiveDateTime>,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) score: Option<f64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentAnswer {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) exam_question_id: String,
    pub(crate) submitted_answer: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
