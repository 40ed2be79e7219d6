use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::{AnswerOption, ExamModule, ExamQuestion, ExamSection};
use crate::db::types::QuestionType;
use crate::services::exam_summary::ModuleStats;

pub(crate) const SECTION_COLUMNS: &str = "id, exam_id, title, position, created_at";

/// One question of the delivery view: exam-question identity plus the
/// student-safe bank fields (no correct-answer data).
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DeliveryQuestionRow {
    pub(crate) exam_question_id: String,
    pub(crate) module_id: String,
    pub(crate) question_id: String,
    pub(crate) order_index: i32,
    pub(crate) question_type: QuestionType,
    pub(crate) prompt: String,
    pub(crate) options: Json<Vec<AnswerOption>>,
}

pub(crate) async fn sections_by_exam(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<ExamSection>, sqlx::Error> {
    sqlx::query_as::<_, ExamSection>(&format!(
        "SELECT {SECTION_COLUMNS} FROM exam_sections WHERE exam_id = $1 ORDER BY position"
    ))
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn section_count(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM exam_sections WHERE exam_id = $1")
        .bind(exam_id)
        .fetch_one(executor)
        .await
}

pub(crate) async fn modules_by_exam(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<ExamModule>, sqlx::Error> {
    sqlx::query_as::<_, ExamModule>(
        "SELECT m.id, m.section_id, m.module_type, m.difficulty, m.time_limit, m.position, \
                m.created_at
         FROM exam_modules m
         JOIN exam_sections s ON s.id = m.section_id
         WHERE s.exam_id = $1
         ORDER BY s.position, m.position",
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

/// Per-module question counts feeding the structure resolver.
pub(crate) async fn module_stats_by_exam(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<Vec<ModuleStats>, sqlx::Error> {
    sqlx::query_as::<_, ModuleStats>(
        "SELECT s.id AS section_id, m.module_type, m.difficulty, m.time_limit, \
                COUNT(q.id) AS question_count
         FROM exam_sections s
         JOIN exam_modules m ON m.section_id = s.id
         LEFT JOIN exam_questions q ON q.module_id = m.id
         WHERE s.exam_id = $1
         GROUP BY s.id, s.position, m.id, m.module_type, m.difficulty, m.time_limit, m.position
         ORDER BY s.position, m.position",
    )
    .bind(exam_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn delivery_questions_by_exam(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<DeliveryQuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, DeliveryQuestionRow>(
        "SELECT eq.id AS exam_question_id, eq.module_id, eq.question_id, eq.order_index, \
                qb.question_type, qb.prompt, qb.options
         FROM exam_questions eq
         JOIN exam_modules m ON m.id = eq.module_id
         JOIN exam_sections s ON s.id = m.section_id
         JOIN question_bank_items qb ON qb.id = eq.question_id
         WHERE s.exam_id = $1
         ORDER BY s.position, m.position, eq.order_index",
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

/// Resolves a question-bank id to its exam-question row within one exam.
pub(crate) async fn find_exam_question(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
    question_id: &str,
) -> Result<Option<ExamQuestion>, sqlx::Error> {
    sqlx::query_as::<_, ExamQuestion>(
        "SELECT eq.id, eq.module_id, eq.question_id, eq.order_index, eq.created_at
         FROM exam_questions eq
         JOIN exam_modules m ON m.id = eq.module_id
         JOIN exam_sections s ON s.id = m.section_id
         WHERE s.exam_id = $1 AND eq.question_id = $2
         ORDER BY s.position, m.position, eq.order_index
         LIMIT 1",
    )
    .bind(exam_id)
    .bind(question_id)
    .fetch_optional(executor)
    .await
}
