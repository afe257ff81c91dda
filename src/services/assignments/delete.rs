use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let scoring = service.get_scoring(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::AssignmentNotFound,
                "Failed to get assignment",
            ));
        }
    };

    match storage.deactivate_assignment(assignment_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AssignmentInactive,
                "Assignment already deleted",
            )));
        }
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::AssignmentNotFound,
                "Assignment deletion failed",
            ));
        }
    }
    info!(
        "Assignment {} deactivated in subject {}",
        assignment_id, assignment.subject_id
    );

    match scoring.trigger_recompute(&[assignment.subject_id]).await {
        Ok(recompute) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            recompute,
            "Assignment deleted successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::RecomputeFailed,
            "Assignment deleted but recompute failed",
        )),
    }
}
