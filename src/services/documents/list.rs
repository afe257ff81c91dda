use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DocumentService;
use crate::models::documents::requests::DocumentListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;

pub async fn list_documents(
    service: &DocumentService,
    request: &HttpRequest,
    query: DocumentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_documents(query.subject_id).await {
        Ok(documents) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            documents,
            "Documents retrieved successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::DocumentNotFound,
            "Failed to list documents",
        )),
    }
}
