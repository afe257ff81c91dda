use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    /// 占位分值，创建后立即被重新分配覆盖
    pub score: Option<f64>,
}

/// 更新作业请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    /// 修改后会同时重算原科目和新科目
    pub subject_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// 作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListParams {
    pub subject_id: Option<i64>,
    pub include_inactive: Option<bool>,
}

/// 存储层作业过滤条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AssignmentFilter {
    pub subject_id: Option<i64>,
    pub active_only: bool,
}

impl AssignmentFilter {
    /// 某科目下的有效作业
    pub fn active_in_subject(subject_id: i64) -> Self {
        Self {
            subject_id: Some(subject_id),
            active_only: true,
        }
    }
}

impl From<AssignmentListParams> for AssignmentFilter {
    fn from(params: AssignmentListParams) -> Self {
        Self {
            subject_id: params.subject_id,
            active_only: !params.include_inactive.unwrap_or(false),
        }
    }
}
