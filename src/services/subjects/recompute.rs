use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;

pub async fn recompute_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    // 后台模式下任务异步失败，这里先确认科目存在
    match scoring.storage().get_subject_by_id(subject_id).await {
        Ok(Some(_)) => {}
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
    }

    match scoring.trigger_recompute(&[subject_id]).await {
        Ok(recompute) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            recompute,
            "Subject recompute requested",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::SubjectNotFound,
            "Subject recompute failed",
        )),
    }
}
