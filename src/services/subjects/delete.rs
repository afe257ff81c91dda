use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;

pub async fn delete_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    match scoring.remove_subject(subject_id).await {
        Ok(removal) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            removal,
            "Subject deleted successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::SubjectNotFound,
            "Subject deletion failed",
        )),
    }
}
