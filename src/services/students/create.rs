use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::errors::ScorebookError;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;
use crate::utils::validate::{validate_required, validate_student_code};

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    student_data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_student_code(&student_data.student_code)
        .and_then(|_| validate_required(&student_data.name, "name must not be empty"))
        .and_then(|_| validate_required(&student_data.class_name, "class_name must not be empty"))
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    match storage.create_student(student_data).await {
        Ok(student) => {
            info!("Student {} ({}) created", student.id, student.student_code);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(student, "Student created successfully")))
        }
        Err(ScorebookError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::StudentAlreadyExists, "Student code already exists"),
        )),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::StudentNotFound,
            "Student creation failed",
        )),
    }
}
