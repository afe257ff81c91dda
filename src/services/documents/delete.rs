use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DocumentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;

pub async fn delete_document(
    service: &DocumentService,
    request: &HttpRequest,
    document_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_document(document_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Document deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DocumentNotFound,
            "Document not found",
        ))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::DocumentNotFound,
            "Document deletion failed",
        )),
    }
}
