use crate::services::scoring::QuestionRecord;

/// Every assigned question joined with its answer key, in delivery order.
/// This is the scoring engine's read of ground truth.
pub(crate) async fn scoring_records_by_exam(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<Vec<QuestionRecord>, sqlx::Error> {
    sqlx::query_as::<_, QuestionRecord>(
        "SELECT eq.id AS exam_question_id, s.id AS section_id, m.module_type, m.difficulty, \
                qb.question_type, qb.correct_option_id, qb.correct_answer
         FROM exam_questions eq
         JOIN exam_modules m ON m.id = eq.module_id
         JOIN exam_sections s ON s.id = m.section_id
         JOIN question_bank_items qb ON qb.id = eq.question_id
         WHERE s.exam_id = $1
         ORDER BY s.position, m.position, eq.order_index",
    )
    .bind(exam_id)
    .fetch_all(executor)
    .await
}
