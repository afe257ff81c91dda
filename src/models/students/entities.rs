use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    // 学号（业务主键）
    pub student_code: String,
    pub name: String,
    pub class_name: String,
    // 所有提交分数之和，由汇总器维护
    pub total_score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
