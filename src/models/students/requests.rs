use serde::Deserialize;

use crate::models::common::pagination::PaginationQuery;

/// 创建学生请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    pub student_code: String,
    pub name: String,
    pub class_name: String,
}

/// 学生列表查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct StudentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub class_name: Option<String>,
}

/// 重算学生总分的范围参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentTotalParams {
    /// 仅统计该科目（结果不落库）
    pub subject_id: Option<i64>,
}
