pub mod create;
pub mod delete;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::documents::requests::{CreateDocumentRequest, DocumentListParams};
use crate::storage::Storage;

pub struct DocumentService {
    storage: Option<Arc<dyn Storage>>,
}

impl DocumentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_documents(
        &self,
        request: &HttpRequest,
        query: DocumentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_documents(self, request, query).await
    }

    pub async fn create_document(
        &self,
        request: &HttpRequest,
        document_data: CreateDocumentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_document(self, request, document_data).await
    }

    pub async fn delete_document(
        &self,
        request: &HttpRequest,
        document_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_document(self, request, document_id).await
    }
}
