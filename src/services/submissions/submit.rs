use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::ScorebookError;
use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;
use crate::utils::validate::validate_file_url;

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_data: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    if let Err(msg) = validate_file_url(&submission_data.file_url) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    match scoring.record_submission(submission_data).await {
        Ok(receipt) if receipt.created => Ok(HttpResponse::Created().json(
            ApiResponse::success(receipt, "Submission created successfully"),
        )),
        Ok(receipt) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            receipt,
            "Submission updated successfully",
        ))),
        Err(ScorebookError::NotFound(msg)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::NotFound, format!("Submission rejected: {msg}")),
        )),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::NotFound,
            "Submission rejected",
        )),
    }
}
