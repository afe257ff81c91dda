use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::scoring::responses::MutationWithRecompute;
use crate::models::subjects::requests::UpdateSubjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scoring::SCORE_EPSILON;
use crate::utils::error_response;
use crate::utils::validate::{validate_max_score, validate_required};

pub async fn update_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    update_data: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_update(&update_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubjectInvalidMaxScore,
            msg,
        )));
    }

    let existing = match storage.get_subject_by_id(subject_id).await {
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

    let max_score_changed = update_data
        .max_score
        .is_some_and(|m| (m - existing.max_score).abs() > SCORE_EPSILON);

    let subject = match storage.update_subject(subject_id, update_data).await {
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
                "Subject update failed",
            ));
        }
    };

    if !max_score_changed {
        return Ok(
            HttpResponse::Ok().json(ApiResponse::success(subject, "Subject updated successfully"))
        );
    }

    info!(
        "Subject {} max score changed {} -> {}",
        subject_id, existing.max_score, subject.max_score
    );
    let scoring = service.get_scoring(request);
    match scoring.trigger_recompute(&[subject_id]).await {
        Ok(recompute) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MutationWithRecompute {
                item: subject,
                recompute,
            },
            "Subject updated, scores recomputed",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::RecomputeFailed,
            "Subject updated but recompute failed",
        )),
    }
}

fn validate_update(update_data: &UpdateSubjectRequest) -> Result<(), &'static str> {
    if let Some(name) = &update_data.name {
        validate_required(name, "name must not be empty")?;
    }
    if let Some(class_name) = &update_data.class_name {
        validate_required(class_name, "class_name must not be empty")?;
    }
    if let Some(max_score) = update_data.max_score {
        validate_max_score(max_score)?;
    }
    Ok(())
}
