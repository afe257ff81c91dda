use serde::{Deserialize, Serialize};

/// 业务错误码，随 ApiResponse 一起返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,
    StoreUnavailable = 1503,

    // 科目 2xxx
    SubjectNotFound = 2000,
    SubjectInvalidMaxScore = 2001,

    // 学生 3xxx
    StudentNotFound = 3000,
    StudentAlreadyExists = 3001,

    // 作业 4xxx
    AssignmentNotFound = 4000,
    AssignmentInactive = 4001,

    // 提交 5xxx
    SubmissionNotFound = 5000,

    // 教学资料 6xxx
    DocumentNotFound = 6000,

    // 重算任务 7xxx
    RecomputeJobNotFound = 7000,
    RecomputeFailed = 7001,
}
