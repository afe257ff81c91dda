use serde::Serialize;
use uuid::Uuid;

use crate::models::scoring::entities::{AssignmentScoreChange, SubmissionScoreChange};

/// 重新分配结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redistribution {
    pub subject_id: i64,
    pub total_assignments: i32,
    pub score_per_assignment: f64,
    pub changed_assignments: Vec<AssignmentScoreChange>,
}

/// 单条提交写入失败
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionFailure {
    pub submission_id: i64,
    pub error: String,
}

/// 提交重缩放结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RescaleOutcome {
    pub updated_count: usize,
    pub failures: Vec<SubmissionFailure>,
    pub changed_submissions: Vec<SubmissionScoreChange>,
}

/// 学生总分重算结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentTotal {
    pub student_id: i64,
    pub new_total: f64,
    /// 指定科目时为科目小计
    pub scope_subject_id: Option<i64>,
    /// 科目小计不落库
    pub persisted: bool,
}

/// 单个学生总分写入失败
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentFailure {
    pub student_id: i64,
    pub error: String,
}

/// 全体学生总分重算结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterRecalculation {
    pub updated_count: usize,
    pub failures: Vec<StudentFailure>,
}

/// 科目完整重算报告（重新分配 + 重缩放 + 汇总）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRecomputeReport {
    pub subject_id: i64,
    pub redistribution: Redistribution,
    pub rescale: RescaleOutcome,
    pub students_updated: usize,
    pub student_failures: Vec<StudentFailure>,
}

impl SubjectRecomputeReport {
    /// 是否存在部分写入失败
    pub fn is_partial(&self) -> bool {
        !self.rescale.failures.is_empty() || !self.student_failures.is_empty()
    }
}

/// 作业变更后触发的重算结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RecomputeTrigger {
    /// 已提交后台任务
    Background { job_ids: Vec<Uuid> },
    /// 已在请求内完成
    Inline { reports: Vec<SubjectRecomputeReport> },
}

/// 带重算信息的变更响应
#[derive(Debug, Clone, Serialize)]
pub struct MutationWithRecompute<T: Serialize> {
    pub item: T,
    pub recompute: RecomputeTrigger,
}
