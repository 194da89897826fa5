use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{AccountId, NewAccount};
use super::repository::{AccountRepository, AssessmentCatalog, LinkRepository, RepositoryError};
use super::service::{AccessError, AccessService};

/// Router builder exposing the code issuance and linking endpoints.
pub fn access_router<A, L, C>(service: Arc<AccessService<A, L, C>>) -> Router
where
    A: AccountRepository + 'static,
    L: LinkRepository + 'static,
    C: AssessmentCatalog + 'static,
{
    Router::new()
        .route("/api/v1/accounts", post(register_handler::<A, L, C>))
        .route(
            "/api/v1/recruiter-codes/validate",
            post(validate_handler::<A, L, C>),
        )
        .route(
            "/api/v1/students/:student_id/recruiters",
            post(link_handler::<A, L, C>).get(recruiters_handler::<A, L, C>),
        )
        .route(
            "/api/v1/students/:student_id/assessments",
            get(assessments_handler::<A, L, C>),
        )
        .with_state(service)
}

/// Request body carrying a presented recruiter code.
#[derive(Debug, Deserialize)]
pub struct CodePayload {
    pub recruiter_code: String,
}

pub(crate) async fn register_handler<A, L, C>(
    State(service): State<Arc<AccessService<A, L, C>>>,
    axum::Json(account): axum::Json<NewAccount>,
) -> Response
where
    A: AccountRepository + 'static,
    L: LinkRepository + 'static,
    C: AssessmentCatalog + 'static,
{
    match service.register_account(account) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(AccessError::Repository(RepositoryError::DuplicateAccount)) => {
            let payload = json!({
                "error": "account already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn validate_handler<A, L, C>(
    State(service): State<Arc<AccessService<A, L, C>>>,
    axum::Json(payload): axum::Json<CodePayload>,
) -> Response
where
    A: AccountRepository + 'static,
    L: LinkRepository + 'static,
    C: AssessmentCatalog + 'static,
{
    match service.validate_code(&payload.recruiter_code) {
        Ok(validation) => (StatusCode::OK, axum::Json(validation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn link_handler<A, L, C>(
    State(service): State<Arc<AccessService<A, L, C>>>,
    Path(student_id): Path<String>,
    axum::Json(payload): axum::Json<CodePayload>,
) -> Response
where
    A: AccountRepository + 'static,
    L: LinkRepository + 'static,
    C: AssessmentCatalog + 'static,
{
    let student_id = AccountId(student_id);
    match service.link(&student_id, &payload.recruiter_code) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recruiters_handler<A, L, C>(
    State(service): State<Arc<AccessService<A, L, C>>>,
    Path(student_id): Path<String>,
) -> Response
where
    A: AccountRepository + 'static,
    L: LinkRepository + 'static,
    C: AssessmentCatalog + 'static,
{
    let student_id = AccountId(student_id);
    match service.recruiters_for(&student_id) {
        Ok(recruiters) => (StatusCode::OK, axum::Json(recruiters)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessments_handler<A, L, C>(
    State(service): State<Arc<AccessService<A, L, C>>>,
    Path(student_id): Path<String>,
) -> Response
where
    A: AccountRepository + 'static,
    L: LinkRepository + 'static,
    C: AssessmentCatalog + 'static,
{
    let student_id = AccountId(student_id);
    match service.visible_assessments(&student_id) {
        Ok(assessments) => (StatusCode::OK, axum::Json(assessments)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AccessError) -> Response {
    let status = match &error {
        AccessError::InvalidCode => StatusCode::BAD_REQUEST,
        AccessError::NotAStudent { .. } => StatusCode::FORBIDDEN,
        AccessError::SelfLinkNotAllowed => StatusCode::CONFLICT,
        AccessError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AccessError::CodeSpaceExhausted { .. } | AccessError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(%error, "access operation failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
