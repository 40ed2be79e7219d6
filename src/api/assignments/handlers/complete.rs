use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::assignments::helpers;
use crate::api::errors::ApiError;
use crate::api::guards::ActingStudent;
use crate::core::state::AppState;
use crate::db::types::AssignmentStatus;
use crate::repositories;
use crate::schemas::assignment::{format_primitive, CompletionResponse};
use crate::services::scoring;

/// Single-shot completion: scores the attempt and flips the assignment to
/// COMPLETED. The answer read and the status flip share one transaction under
/// the delivery lock, so a racing answer save is either fully reflected in the
/// score or rejected as a conflict afterwards.
pub(in crate::api::assignments) async fn complete_assignment(
    Path(exam_id): Path<String>,
    ActingStudent(student_id): ActingStudent,
    State(state): State<AppState>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let exam = helpers::fetch_exam(state.db(), &exam_id).await?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    repositories::assignments::acquire_delivery_lock(&mut *tx, &exam.id, &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to acquire assignment lock"))?;

    let assignment =
        repositories::assignments::find_by_exam_and_student(&mut *tx, &exam.id, &student_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
            .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    if assignment.status == AssignmentStatus::Completed {
        return Err(ApiError::Conflict("Exam already completed".to_string()));
    }

    let records = repositories::question_bank::scoring_records_by_exam(&mut *tx, &exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answer keys"))?;
    let answers: std::collections::HashMap<String, String> =
        repositories::answers::list_by_assignment(&mut *tx, &assignment.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch answers"))?
            .into_iter()
            .map(|answer| (answer.exam_question_id, answer.submitted_answer))
            .collect();

    let breakdown = scoring::score_assignment(&records, &answers);

    let now = helpers::now_primitive();
    let completed =
        repositories::assignments::complete(&mut *tx, &assignment.id, breakdown.score, now)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to complete assignment"))?;
    if !completed {
        return Err(ApiError::Conflict("Exam already completed".to_string()));
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    metrics::counter!("assignment_completions_total").increment(1);
    tracing::info!(
        exam_id = %exam.id,
        student_id = %student_id,
        score = ?breakdown.score,
        answered = breakdown.answered_questions,
        "Assignment completed"
    );

    Ok(Json(CompletionResponse {
        score: breakdown.score,
        correct_answers: breakdown.correct_answers,
        scored_questions: breakdown.scored_questions,
        answered_questions: breakdown.answered_questions,
        total_questions: breakdown.total_questions,
        manually_graded: breakdown.manually_graded(),
        completed_at: format_primitive(now),
    }))
}
