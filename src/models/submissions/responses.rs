use serde::Serialize;

use crate::models::submissions::entities::Submission;

/// 提交结果
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub submission: Submission,
    /// true 表示新建，false 表示覆盖了已有提交
    pub created: bool,
    /// 本次提交带来的分数变化
    pub score_change: f64,
    /// 更新后的学生总分
    pub student_total: f64,
}
