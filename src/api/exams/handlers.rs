use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::exam::{
    AnswerOptionResponse, ExamDetailQuery, ExamResponse, ExamSummaryResponse, ModuleResponse,
    QuestionResponse, SectionResponse,
};
use crate::services::adaptive::module_in_variant;
use crate::services::exam_summary::{normalize_minutes, resolve_summary};

/// Normalized structural summary: what the student will actually experience,
/// not the raw row counts.
pub(in crate::api::exams) async fn get_exam_summary(
    Path(exam_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ExamSummaryResponse>, ApiError> {
    let exam = repositories::exams::find_by_id(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    let modules = repositories::structure::module_stats_by_exam(state.db(), &exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch module stats"))?;
    let section_count = repositories::structure::section_count(state.db(), &exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count sections"))?;

    let canonical = state.settings().exam().canonical_for_program(&exam.program);
    let summary = resolve_summary(&exam, &modules, section_count, canonical);

    Ok(Json(ExamSummaryResponse::from_summary(exam.id, summary)))
}

/// Delivery view of the structure. `?difficulty=` applies the adaptive-variant
/// decision made by the upstream router; without it both variants are shown.
pub(in crate::api::exams) async fn get_exam(
    Path(exam_id): Path<String>,
    Query(query): Query<ExamDetailQuery>,
    State(state): State<AppState>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = repositories::exams::find_by_id(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    let sections = repositories::structure::sections_by_exam(state.db(), &exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch sections"))?;
    let modules = repositories::structure::modules_by_exam(state.db(), &exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch modules"))?;
    let questions = repositories::structure::delivery_questions_by_exam(state.db(), &exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch questions"))?;

    let mut questions_by_module: HashMap<String, Vec<QuestionResponse>> = HashMap::new();
    for question in questions {
        questions_by_module.entry(question.module_id.clone()).or_default().push(
            QuestionResponse {
                question_id: question.question_id,
                order: question.order_index,
                question_type: question.question_type,
                prompt: question.prompt,
                options: question
                    .options
                    .0
                    .into_iter()
                    .map(|option| AnswerOptionResponse { id: option.id, text: option.text })
                    .collect(),
            },
        );
    }

    let mut modules_by_section: HashMap<String, Vec<ModuleResponse>> = HashMap::new();
    for module in modules {
        if !module_in_variant(&module, query.difficulty) {
            continue;
        }
        modules_by_section.entry(module.section_id.clone()).or_default().push(ModuleResponse {
            questions: questions_by_module.remove(&module.id).unwrap_or_default(),
            id: module.id,
            module_type: module.module_type,
            difficulty: module.difficulty,
            time_limit_minutes: module.time_limit.map(normalize_minutes),
            position: module.position,
        });
    }

    let sections = sections
        .into_iter()
        .map(|section| SectionResponse {
            modules: modules_by_section.remove(&section.id).unwrap_or_default(),
            id: section.id,
            title: section.title,
            position: section.position,
        })
        .collect();

    Ok(Json(ExamResponse {
        id: exam.id,
        title: exam.title,
        program: exam.program,
        is_practice: exam.is_practice,
        time_limit_minutes: exam.time_limit.map(normalize_minutes),
        sections,
    }))
}
