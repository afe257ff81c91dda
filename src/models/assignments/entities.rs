use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的科目 ID
    pub subject_id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 截止时间
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    // 作业分值（由重新分配引擎计算，创建时的值仅为占位）
    pub score: f64,
    // 是否有效（删除为软删除）
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
