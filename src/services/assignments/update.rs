use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::scoring::responses::MutationWithRecompute;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;
use crate::utils::validate::validate_required;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    update_data: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let scoring = service.get_scoring(request);

    let title_check = update_data
        .title
        .as_deref()
        .map_or(Ok(()), |t| validate_required(t, "title must not be empty"));
    if let Err(msg) = title_check {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    let existing = match storage.get_assignment_by_id(assignment_id).await {
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

    let old_subject_id = existing.subject_id;
    let new_subject_id = update_data.subject_id.unwrap_or(old_subject_id);

    if new_subject_id != old_subject_id {
        match storage.get_subject_by_id(new_subject_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SubjectNotFound,
                    "Target subject not found",
                )));
            }
            Err(e) => {
                return Ok(error_response(
                    &e,
                    ErrorCode::SubjectNotFound,
                    "Failed to get subject",
                ));
            }
        }
    }

    let assignment = match storage.update_assignment(assignment_id, update_data).await {
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
                "Assignment update failed",
            ));
        }
    };

    let mut affected = vec![old_subject_id];
    if new_subject_id != old_subject_id {
        match storage
            .move_assignment_submissions(assignment_id, new_subject_id)
            .await
        {
            Ok(moved) => info!(
                "Assignment {} moved from subject {} to {}, {} submissions followed",
                assignment_id, old_subject_id, new_subject_id, moved
            ),
            Err(e) => {
                return Ok(error_response(
                    &e,
                    ErrorCode::AssignmentNotFound,
                    "Assignment moved but submissions were not updated",
                ));
            }
        }
        affected.push(new_subject_id);
    }

    let recompute = match scoring.trigger_recompute(&affected).await {
        Ok(recompute) => recompute,
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::RecomputeFailed,
                "Assignment updated but recompute failed",
            ));
        }
    };

    let item = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(fresh)) => fresh,
        _ => assignment,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MutationWithRecompute { item, recompute },
        "Assignment updated successfully",
    )))
}
