use crate::api::errors::ApiError;
pub(crate) use crate::core::time::primitive_now_utc as now_primitive;
use crate::db::models::{Exam, ExamAssignment};
use crate::repositories;
use crate::schemas::assignment::{format_primitive, AssignmentResponse};

pub(crate) async fn fetch_exam(pool: &sqlx::PgPool, exam_id: &str) -> Result<Exam, ApiError> {
    repositories::exams::find_by_id(pool, exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))
}

pub(crate) fn assignment_to_response(assignment: ExamAssignment) -> AssignmentResponse {
    AssignmentResponse {
        id: assignment.id,
        exam_id: assignment.exam_id,
        student_id: assignment.student_id,
        status: assignment.status,
        started_at: assignment.started_at.map(format_primitive),
        completed_at: assignment.completed_at.map(format_primitive),
        score: assignment.score,
    }
}
