use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::errors::ApiError;

/// Header carrying the acting student's identity, set by the upstream gateway
/// after authentication. Identity is always an explicit per-request value here,
/// never ambient session state.
pub(crate) const STUDENT_ID_HEADER: &str = "x-student-id";

const MAX_STUDENT_ID_LEN: usize = 64;

pub(crate) struct ActingStudent(pub(crate) String);

#[async_trait]
impl<S> FromRequestParts<S> for ActingStudent
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let student_id = parts
            .headers
            .get(STUDENT_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthorized("Missing X-Student-Id header"))?;

        if student_id.len() > MAX_STUDENT_ID_LEN
            || !student_id.chars().all(|c| c.is_ascii_graphic())
        {
            return Err(ApiError::Unauthorized("Invalid X-Student-Id header"));
        }

        Ok(ActingStudent(student_id.to_string()))
    }
}
