use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::assignments::helpers;
use crate::api::errors::ApiError;
use crate::api::guards::ActingStudent;
use crate::core::state::AppState;
use crate::db::types::AssignmentStatus;
use crate::repositories;
use crate::schemas::assignment::{
    format_primitive, SaveAnswerRequest, SaveAnswerResponse, SavedAnswersResponse,
};

/// Idempotent answer upsert. Creates the assignment on first contact, flips it
/// to in-progress, and replaces any earlier answer to the same question.
pub(in crate::api::assignments) async fn save_answer(
    Path((exam_id, question_id)): Path<(String, String)>,
    ActingStudent(student_id): ActingStudent,
    State(state): State<AppState>,
    Json(payload): Json<SaveAnswerRequest>,
) -> Result<Json<SaveAnswerResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let exam = helpers::fetch_exam(state.db(), &exam_id).await?;

    let exam_question =
        repositories::structure::find_exam_question(state.db(), &exam.id, &question_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to resolve question"))?
            .ok_or_else(|| {
                ApiError::NotFound("Question is not part of this exam".to_string())
            })?;

    let limit = state.settings().exam().answer_save_rate_limit;
    let window = state.settings().exam().answer_save_window_seconds;
    let rate_key = format!("answersave:{student_id}:{}", exam.id);
    let allowed = match state.redis().rate_limit(&rate_key, limit, window).await {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = %err, "Failed to check answer-save rate limit");
            false
        }
    };
    if !allowed {
        return Err(ApiError::TooManyRequests("Answer-save rate limit exceeded"));
    }

    let now = helpers::now_primitive();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    repositories::assignments::acquire_delivery_lock(&mut *tx, &exam.id, &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to acquire assignment lock"))?;

    repositories::assignments::ensure(
        &mut *tx,
        &Uuid::new_v4().to_string(),
        &exam.id,
        &student_id,
        now,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to ensure assignment"))?;

    let assignment =
        repositories::assignments::find_by_exam_and_student(&mut *tx, &exam.id, &student_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
            .ok_or_else(|| ApiError::Internal("Assignment missing after ensure".to_string()))?;

    if assignment.status == AssignmentStatus::Completed {
        return Err(ApiError::Conflict(
            "Exam already completed, retake it to change answers".to_string(),
        ));
    }

    repositories::answers::upsert(
        &mut *tx,
        repositories::answers::UpsertAnswer {
            id: &Uuid::new_v4().to_string(),
            assignment_id: &assignment.id,
            exam_question_id: &exam_question.id,
            submitted_answer: &payload.answer,
            now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save answer"))?;

    repositories::assignments::mark_in_progress(&mut *tx, &assignment.id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update assignment"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(SaveAnswerResponse {
        question_id,
        status: AssignmentStatus::InProgress,
        saved_at: format_primitive(now),
    }))
}

/// All saved answers keyed by question-bank id. An exam the student never
/// touched yields an empty map, not an error.
pub(in crate::api::assignments) async fn get_saved_answers(
    Path(exam_id): Path<String>,
    ActingStudent(student_id): ActingStudent,
    State(state): State<AppState>,
) -> Result<Json<SavedAnswersResponse>, ApiError> {
    let exam = helpers::fetch_exam(state.db(), &exam_id).await?;

    let assignment =
        repositories::assignments::find_by_exam_and_student(state.db(), &exam.id, &student_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?;

    let answers = match assignment {
        Some(assignment) => repositories::answers::map_by_question(state.db(), &assignment.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch answers"))?,
        None => Default::default(),
    };

    Ok(Json(SavedAnswersResponse { answers }))
}
