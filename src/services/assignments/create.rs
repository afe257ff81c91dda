use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::scoring::responses::MutationWithRecompute;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;
use crate::utils::validate::validate_required;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_data: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let scoring = service.get_scoring(request);

    if let Err(msg) = validate_required(&assignment_data.title, "title must not be empty") {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    let subject = match storage.get_subject_by_id(assignment_data.subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "Subject not found",
            )));
        }
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::SubjectNotFound,
                "Failed to get subject",
            ));
        }
    };

    // 占位分值，随后由重新分配覆盖
    let placeholder = assignment_data
        .score
        .filter(|s| s.is_finite() && *s >= 0.0)
        .unwrap_or(subject.max_score);

    let assignment = match storage.create_assignment(assignment_data, placeholder).await {
        Ok(assignment) => assignment,
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::SubjectNotFound,
                "Assignment creation failed",
            ));
        }
    };
    info!(
        "Assignment {} created in subject {}",
        assignment.id, assignment.subject_id
    );

    let recompute = match scoring.trigger_recompute(&[subject.id]).await {
        Ok(recompute) => recompute,
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::RecomputeFailed,
                "Assignment created but recompute failed",
            ));
        }
    };

    // 同步重算时返回重新分配后的分值
    let item = match storage.get_assignment_by_id(assignment.id).await {
        Ok(Some(fresh)) => fresh,
        _ => assignment,
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        MutationWithRecompute { item, recompute },
        "Assignment created successfully",
    )))
}
