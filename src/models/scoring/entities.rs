use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::scoring::responses::SubjectRecomputeReport;

/// 作业分值变化（重新分配的输出，重缩放的输入）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentScoreChange {
    pub assignment_id: i64,
    pub old_score: f64,
    pub new_score: f64,
}

/// 提交分数变化，用于审计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubmissionScoreChange {
    pub submission_id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub old_score: f64,
    pub new_score: f64,
}

/// 后台重算任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

/// 后台重算任务记录
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeJob {
    pub job_id: Uuid,
    pub subject_id: i64,
    pub status: JobStatus,
    pub queued_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    pub report: Option<SubjectRecomputeReport>,
    pub error: Option<String>,
}
