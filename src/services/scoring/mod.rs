//! 计分引擎
//!
//! - `redistribute`: 按有效作业数量重新分配科目满分
//! - `rescale`: 作业分值变化后按比例调整提交分数
//! - `aggregate`: 学生总分汇总
//! - `submit`: 提交写入与总分增量更新
//! - `pipeline`: 科目级完整重算
//! - `jobs`: 后台重算任务
//! - `views`: 学生作业清单与班级成绩表
//!
//! 引擎只通过 `Storage` 接口读写记录。

pub mod aggregate;
pub mod jobs;
pub mod locks;
pub mod pipeline;
pub mod redistribute;
pub mod rescale;
pub mod submit;
pub mod views;

use actix_web::HttpRequest;
use std::sync::Arc;

use crate::config::ScoringConfig;
use crate::storage::Storage;

pub use jobs::{RecomputeHandle, RecomputeJobs};
pub use locks::{KeyedLocks, StudentLocks, SubjectLocks};
pub use pipeline::SubjectRemoval;
pub use redistribute::distribute;
pub use rescale::rescale_score;

/// 分数比较容差
pub const SCORE_EPSILON: f64 = 1e-9;

pub struct ScoringService {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) locks: SubjectLocks,
    pub(crate) student_locks: StudentLocks,
    pub(crate) jobs: RecomputeJobs,
    background: bool,
}

impl ScoringService {
    pub fn new(storage: Arc<dyn Storage>, config: &ScoringConfig) -> Self {
        Self {
            storage,
            locks: SubjectLocks::new(),
            student_locks: StudentLocks::new(),
            jobs: RecomputeJobs::new(config.max_tracked_jobs),
            background: config.background_recompute,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn jobs(&self) -> &RecomputeJobs {
        &self.jobs
    }

    pub fn background_enabled(&self) -> bool {
        self.background
    }

    /// 从应用数据中获取计分引擎
    pub(crate) fn from_request(request: &HttpRequest) -> Arc<ScoringService> {
        request
            .app_data::<actix_web::web::Data<Arc<ScoringService>>>()
            .expect("ScoringService not found in app data")
            .get_ref()
            .clone()
    }
}
