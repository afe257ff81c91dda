use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// 首次提交
    Submitted,
    /// 覆盖了之前的提交
    Resubmitted,
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const RESUBMITTED: &'static str = "resubmitted";
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "{}", Self::SUBMITTED),
            SubmissionStatus::Resubmitted => write!(f, "{}", Self::RESUBMITTED),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            Self::RESUBMITTED => Ok(SubmissionStatus::Resubmitted),
            other => Err(format!("Invalid submission status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub subject_id: i64,
    pub file_name: String,
    // 外部文件存储返回的地址
    pub file_url: String,
    // 得分，范围 [0, 作业分值]
    pub score: f64,
    pub status: SubmissionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_str() {
        assert_eq!(
            "resubmitted".parse::<SubmissionStatus>(),
            Ok(SubmissionStatus::Resubmitted)
        );
        assert_eq!(SubmissionStatus::Submitted.to_string(), "submitted");
        assert!("graded".parse::<SubmissionStatus>().is_err());
    }
}
