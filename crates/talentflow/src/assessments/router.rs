use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CandidateId, JobId, Section};
use super::repository::AssessmentStore;
use super::responses::ResponseMap;
use super::service::{AssessmentService, SubmissionError};

/// Body of `PUT /api/assessments/:job_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAssessmentRequest {
    pub sections: Vec<Section>,
}

/// Body of `POST /api/assessments/:job_id/submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub responses: ResponseMap,
}

/// Router builder exposing the assessment endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: AssessmentStore + 'static,
{
    Router::new()
        .route(
            "/api/assessments/:job_id",
            get(fetch_handler::<S>)
                .put(save_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .route("/api/assessments/:job_id/submit", post(submit_handler::<S>))
        .route(
            "/api/assessments/:job_id/responses/:candidate_id",
            get(response_handler::<S>),
        )
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

/// Malformed bodies keep axum's status code but use the JSON error shape.
fn rejection_response(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), rejection.body_text())
}

pub(crate) async fn fetch_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(job_id): Path<u64>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    match service.load(JobId(job_id)) {
        Ok(Some(assessment)) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Assessment not found"),
        Err(error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    }
}

pub(crate) async fn save_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(job_id): Path<u64>,
    payload: Result<axum::Json<SaveAssessmentRequest>, JsonRejection>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.save_sections(JobId(job_id), request.sections) {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save assessment",
        ),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(job_id): Path<u64>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    match service.delete(JobId(job_id)) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Assessment not found"),
        Err(error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(job_id): Path<u64>,
    payload: Result<axum::Json<SubmitAssessmentRequest>, JsonRejection>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.submit_for_job(request.candidate_id, JobId(job_id), request.responses) {
        Ok(receipt) => {
            let payload = json!({
                "success": true,
                "submittedAt": receipt.submitted_at,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(SubmissionError::ValidationFailed(errors)) => {
            let payload = json!({
                "error": "Please fix the errors before submitting",
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(SubmissionError::UnknownAssessment(_)) => {
            error_response(StatusCode::NOT_FOUND, "Assessment not found")
        }
        Err(SubmissionError::PersistenceFailed(_)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to submit assessment",
        ),
    }
}

pub(crate) async fn response_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path((job_id, candidate_id)): Path<(u64, u64)>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    match service.response(CandidateId(candidate_id), JobId(job_id)) {
        Ok(Some(response)) => (StatusCode::OK, axum::Json(response)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Response not found"),
        Err(error) => error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    }
}
