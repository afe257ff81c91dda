use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub subject_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentListParams {
    pub subject_id: Option<i64>,
}
