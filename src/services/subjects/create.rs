use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::subjects::requests::{CreateSubjectRequest, DEFAULT_MAX_SCORE};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;
use crate::utils::validate::{validate_max_score, validate_required};

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_data: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_subject(&subject_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubjectInvalidMaxScore,
            msg,
        )));
    }

    match storage.create_subject(subject_data).await {
        Ok(subject) => {
            info!(
                "Subject {} ({}) created with max score {}",
                subject.id, subject.name, subject.max_score
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(subject, "Subject created successfully")))
        }
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::SubjectNotFound,
            "Subject creation failed",
        )),
    }
}

fn validate_subject(subject_data: &CreateSubjectRequest) -> Result<(), &'static str> {
    validate_required(&subject_data.name, "name must not be empty")?;
    validate_required(&subject_data.class_name, "class_name must not be empty")?;
    validate_max_score(subject_data.max_score.unwrap_or(DEFAULT_MAX_SCORE))
}
