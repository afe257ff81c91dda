use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;

pub async fn get_assignments(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    match scoring.student_assignments(student_id).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Student assignments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::StudentNotFound,
            "Failed to get student assignments",
        )),
    }
}

pub async fn get_scoreboard(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    match scoring.class_scoreboard(student_id).await {
        Ok(boards) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            boards,
            "Class scoreboard retrieved successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::StudentNotFound,
            "Failed to get class scoreboard",
        )),
    }
}
