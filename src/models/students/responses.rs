use serde::Serialize;

/// 学生在单个科目下的得分（派生视图，不落库）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectScoreLine {
    pub subject_id: i64,
    pub subject_name: String,
    pub max_score: f64,
    pub earned: f64,
    pub submission_count: usize,
}

/// 学生成绩概览
#[derive(Debug, Clone, Serialize)]
pub struct StudentScoresResponse {
    pub student_id: i64,
    pub student_code: String,
    pub total_score: f64,
    pub subjects: Vec<SubjectScoreLine>,
}

/// 学生在本班科目中的一份有效作业及其提交状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentAssignmentLine {
    pub assignment_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub title: String,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    // 作业当前分值
    pub max_score: f64,
    pub is_submitted: bool,
    // 未提交时为 0
    pub score: f64,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 学生作业清单（包含未提交的作业）
#[derive(Debug, Clone, Serialize)]
pub struct StudentAssignmentsResponse {
    pub student_id: i64,
    pub student_code: String,
    pub class_name: String,
    pub total_score: f64,
    pub pending_count: usize,
    pub assignments: Vec<StudentAssignmentLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreboardColumn {
    pub assignment_id: i64,
    pub title: String,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreboardCell {
    pub assignment_id: i64,
    pub score: f64,
    pub is_submitted: bool,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 成绩表中的一行：一名同班学生在该科目下的成绩
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreboardRow {
    pub student_id: i64,
    pub student_code: String,
    pub name: String,
    pub cells: Vec<ScoreboardCell>,
    pub total_score: f64,
    pub max_total_score: f64,
    // 保留一位小数
    pub percentage: f64,
}

/// 单个科目的班级成绩表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectScoreboard {
    pub subject_id: i64,
    pub subject_name: String,
    pub class_name: String,
    pub assignments: Vec<ScoreboardColumn>,
    pub students: Vec<ScoreboardRow>,
}
