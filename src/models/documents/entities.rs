use serde::{Deserialize, Serialize};

/// 教学资料，文件地址由外部文件存储预先生成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
