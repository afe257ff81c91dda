use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::students::requests::StudentListParams;
use crate::models::{ApiResponse, ErrorCode, PaginatedResponse};
use crate::utils::error_response;

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let students = match storage.list_students().await {
        Ok(students) => students,
        Err(e) => {
            return Ok(error_response(
                &e,
                ErrorCode::StudentNotFound,
                "Failed to list students",
            ));
        }
    };

    let filtered: Vec<_> = match &query.class_name {
        Some(class_name) => students
            .into_iter()
            .filter(|s| &s.class_name == class_name)
            .collect(),
        None => students,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PaginatedResponse::from_items(filtered, &query.pagination),
        "Students retrieved successfully",
    )))
}
