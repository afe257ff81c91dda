use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DocumentService;
use crate::models::documents::requests::CreateDocumentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::error_response;
use crate::utils::validate::{validate_file_url, validate_required};

pub async fn create_document(
    service: &DocumentService,
    request: &HttpRequest,
    document_data: CreateDocumentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_required(&document_data.title, "title must not be empty")
        .and_then(|_| validate_file_url(&document_data.file_url))
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            msg,
        )));
    }

    if let Some(subject_id) = document_data.subject_id {
        match storage.get_subject_by_id(subject_id).await {
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
    }

    match storage.create_document(document_data).await {
        Ok(document) => {
            info!("Document {} ({}) uploaded", document.id, document.title);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(document, "Document created successfully")))
        }
        Err(e) => Ok(error_response(
            &e,
            ErrorCode::DocumentNotFound,
            "Document creation failed",
        )),
    }
}
