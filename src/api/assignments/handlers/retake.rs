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

/// Resets a completed assignment for a fresh attempt: answers are deleted and
/// the same row returns to NOT_STARTED. Retakes are always permitted; any
/// attempt limit is an upstream product decision.
pub(in crate::api::assignments) async fn retake_assignment(
    Path(exam_id): Path<String>,
    ActingStudent(student_id): ActingStudent,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let exam = helpers::fetch_exam(state.db(), &exam_id).await?;

    let now = helpers::now_primitive();
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

    if assignment.status != AssignmentStatus::Completed {
        return Err(ApiError::Conflict(
            "Only a completed exam can be retaken".to_string(),
        ));
    }

    repositories::answers::delete_by_assignment(&mut *tx, &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear answers"))?;
    repositories::assignments::reset(&mut *tx, &assignment.id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reset assignment"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    tracing::info!(exam_id = %exam.id, student_id = %student_id, "Assignment reset for retake");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Assignment reset, a new attempt may begin"
    })))
}
