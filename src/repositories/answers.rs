use std::collections::HashMap;

use time::PrimitiveDateTime;

use crate::db::models::StudentAnswer;

pub(crate) const COLUMNS: &str =
    "id, assignment_id, exam_question_id, submitted_answer, created_at, updated_at";

pub(crate) struct UpsertAnswer<'a> {
    pub(crate) id: &'a str,
    pub(crate) assignment_id: &'a str,
    pub(crate) exam_question_id: &'a str,
    pub(crate) submitted_answer: &'a str,
    pub(crate) now: PrimitiveDateTime,
}

/// Atomic last-write-wins upsert on the (assignment, question) unique pair.
/// Never read-then-write: concurrent saves from two tabs must not lose updates.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    answer: UpsertAnswer<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO student_answers \
             (id, assignment_id, exam_question_id, submitted_answer, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         ON CONFLICT (assignment_id, exam_question_id)
         DO UPDATE SET submitted_answer = EXCLUDED.submitted_answer, \
                       updated_at = EXCLUDED.updated_at",
    )
    .bind(answer.id)
    .bind(answer.assignment_id)
    .bind(answer.exam_question_id)
    .bind(answer.submitted_answer)
    .bind(answer.now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn list_by_assignment(
    executor: impl sqlx::PgExecutor<'_>,
    assignment_id: &str,
) -> Result<Vec<StudentAnswer>, sqlx::Error> {
    sqlx::query_as::<_, StudentAnswer>(&format!(
        "SELECT {COLUMNS} FROM student_answers WHERE assignment_id = $1"
    ))
    .bind(assignment_id)
    .fetch_all(executor)
    .await
}

/// Answers keyed by question-bank id, as clients see them.
pub(crate) async fn map_by_question(
    executor: impl sqlx::PgExecutor<'_>,
    assignment_id: &str,
) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT eq.question_id, sa.submitted_answer
         FROM student_answers sa
         JOIN exam_questions eq ON eq.id = sa.exam_question_id
         WHERE sa.assignment_id = $1",
    )
    .bind(assignment_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().collect())
}

pub(crate) async fn delete_by_assignment(
    executor: impl sqlx::PgExecutor<'_>,
    assignment_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM student_answers WHERE assignment_id = $1")
        .bind(assignment_id)
        .execute(executor)
        .await?;
    Ok(())
}
