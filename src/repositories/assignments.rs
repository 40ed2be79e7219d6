use time::PrimitiveDateTime;

use crate::db::models::ExamAssignment;
use crate::db::types::AssignmentStatus;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, student_id, status, started_at, completed_at, score, created_at, updated_at";

/// Serializes all writes for one (exam, student) pair within the calling
/// transaction. Completion and answer saves take this lock so a racing save is
/// either fully scored or conflicted, never half-applied.
pub(crate) async fn acquire_delivery_lock(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
    student_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(format!("exam_assignment:{exam_id}:{student_id}"))
        .execute(executor)
        .await?;
    Ok(())
}

/// Insert-or-ignore on the (exam, student) unique pair.
pub(crate) async fn ensure(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    exam_id: &str,
    student_id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO exam_assignments (id, exam_id, student_id, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         ON CONFLICT (exam_id, student_id) DO NOTHING",
    )
    .bind(id)
    .bind(exam_id)
    .bind(student_id)
    .bind(AssignmentStatus::NotStarted)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn find_by_exam_and_student(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
    student_id: &str,
) -> Result<Option<ExamAssignment>, sqlx::Error> {
    sqlx::query_as::<_, ExamAssignment>(&format!(
        "SELECT {COLUMNS} FROM exam_assignments WHERE exam_id = $1 AND student_id = $2"
    ))
    .bind(exam_id)
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

/// First-write transition: sets started_at only if unset, so repeated saves
/// are idempotent. Completed assignments are never touched.
pub(crate) async fn mark_in_progress(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE exam_assignments
         SET status = $1, started_at = COALESCE(started_at, $2), updated_at = $2
         WHERE id = $3 AND status <> $4",
    )
    .bind(AssignmentStatus::InProgress)
    .bind(now)
    .bind(id)
    .bind(AssignmentStatus::Completed)
    .execute(executor)
    .await?;
    Ok(())
}

/// Single-shot completion: returns false when the row was already completed,
/// so a concurrent or repeated completion never re-scores.
pub(crate) async fn complete(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    score: Option<f64>,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE exam_assignments
         SET status = $1, completed_at = $2, score = $3, updated_at = $2
         WHERE id = $4 AND status <> $1",
    )
    .bind(AssignmentStatus::Completed)
    .bind(now)
    .bind(score)
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Retake reset: back to NOT_STARTED with all attempt state cleared. The row
/// itself survives so the (exam, student) uniqueness is never violated.
pub(crate) async fn reset(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE exam_assignments
         SET status = $1, started_at = NULL, completed_at = NULL, score = NULL, updated_at = $2
         WHERE id = $3",
    )
    .bind(AssignmentStatus::NotStarted)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}
