use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    // 唯一 ID
    pub id: i64,
    // 科目名称
    pub name: String,
    // 所属班级
    pub class_name: String,
    // 科目满分（按作业数量平均分配）
    pub max_score: f64,
    // 当前有效作业数量（仅由重新分配引擎写入）
    pub total_assignments: i32,
    // 每份作业的基础分值（仅由重新分配引擎写入）
    pub score_per_assignment: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
