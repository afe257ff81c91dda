use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::students::requests::StudentTotalParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;

pub async fn recalculate_total(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    params: StudentTotalParams,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    match scoring
        .recalculate_student_total(student_id, params.subject_id)
        .await
    {
        Ok(total) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            total,
            "Student total recalculated",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::StudentNotFound,
            "Failed to recalculate student total",
        )),
    }
}

pub async fn get_scores(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    match scoring.student_scores(student_id).await {
        Ok(scores) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            scores,
            "Student scores retrieved successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::StudentNotFound,
            "Failed to get student scores",
        )),
    }
}

pub async fn recalculate_all(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scoring = service.get_scoring(request);

    match scoring.recalculate_all_student_totals().await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            outcome,
            "Student totals recalculated",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::StudentNotFound,
            "Failed to recalculate student totals",
        )),
    }
}
