use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::documents::requests::{CreateDocumentRequest, DocumentListParams};
use crate::services::DocumentService;
use crate::utils::SafeDocumentIdI64;

static DOCUMENT_SERVICE: Lazy<DocumentService> = Lazy::new(DocumentService::new_lazy);

pub async fn list_documents(
    req: HttpRequest,
    query: web::Query<DocumentListParams>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE
        .list_documents(&req, query.into_inner())
        .await
}

pub async fn create_document(
    req: HttpRequest,
    document_data: web::Json<CreateDocumentRequest>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE
        .create_document(&req, document_data.into_inner())
        .await
}

pub async fn delete_document(
    req: HttpRequest,
    document_id: SafeDocumentIdI64,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.delete_document(&req, document_id.0).await
}

pub fn configure_documents_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/documents")
            .service(
                web::resource("")
                    .route(web::get().to(list_documents))
                    .route(web::post().to(create_document)),
            )
            .service(web::resource("/{document_id}").route(web::delete().to(delete_document))),
    );
}
