use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::{SubmissionFilter, SubmissionListParams};
use crate::models::{ApiResponse, ErrorCode, PaginatedResponse};
use crate::utils::error_response;

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_submissions(SubmissionFilter::from(&query)).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PaginatedResponse::from_items(submissions, &query.pagination),
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::SubmissionNotFound,
            "Failed to list submissions",
        )),
    }
}
