use serde::Deserialize;

use crate::models::common::pagination::{PaginationQuery, deserialize_optional_i64};

/// 学生提交作业请求（文件已由外部存储上传，此处只带地址）
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAssignmentRequest {
    pub student_id: i64,
    pub assignment_id: i64,
    pub subject_id: i64,
    pub file_name: String,
    pub file_url: String,
    /// 不填则按作业当前分值给满分
    pub score: Option<f64>,
}

/// 提交列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub assignment_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
}

impl From<&SubmissionListParams> for SubmissionFilter {
    fn from(params: &SubmissionListParams) -> Self {
        Self {
            student_id: params.student_id,
            assignment_id: params.assignment_id,
            subject_id: params.subject_id,
        }
    }
}

/// 存储层提交过滤条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SubmissionFilter {
    pub student_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub subject_id: Option<i64>,
}

impl SubmissionFilter {
    pub fn by_student(student_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            ..Default::default()
        }
    }

    pub fn by_subject(subject_id: i64) -> Self {
        Self {
            subject_id: Some(subject_id),
            ..Default::default()
        }
    }
}

/// 新建提交（存储层）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub student_id: i64,
    pub assignment_id: i64,
    pub subject_id: i64,
    pub file_name: String,
    pub file_url: String,
    pub score: f64,
}

/// 重新提交时覆盖的字段（存储层）
#[derive(Debug, Clone)]
pub struct ResubmitSubmission {
    pub file_name: String,
    pub file_url: String,
    pub score: f64,
}
