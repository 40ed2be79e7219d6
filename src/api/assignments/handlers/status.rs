use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::assignments::helpers;
use crate::api::errors::ApiError;
use crate::api::guards::ActingStudent;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::assignment::AssignmentResponse;

pub(in crate::api::assignments) async fn get_assignment(
    Path(exam_id): Path<String>,
    ActingStudent(student_id): ActingStudent,
    State(state): State<AppState>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let exam = helpers::fetch_exam(state.db(), &exam_id).await?;

    let assignment =
        repositories::assignments::find_by_exam_and_student(state.db(), &exam.id, &student_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
            .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    Ok(Json(helpers::assignment_to_response(assignment)))
}
