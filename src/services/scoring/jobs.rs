//! 后台重算任务
//!
//! 每次后台重算对应一个任务记录，可按 ID 查询状态；调用方也可以通过
//! oneshot 通道等待结果。已结束的任务最多保留 `scoring.max_tracked_jobs` 条。

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::{error, info};
use uuid::Uuid;

use super::ScoringService;
use crate::errors::Result;
use crate::models::scoring::{
    entities::{JobStatus, RecomputeJob},
    responses::SubjectRecomputeReport,
};

/// 后台重算句柄
pub struct RecomputeHandle {
    pub job_id: Uuid,
    pub result: oneshot::Receiver<Result<SubjectRecomputeReport>>,
}

pub struct RecomputeJobs {
    jobs: DashMap<Uuid, RecomputeJob>,
    max_tracked: usize,
}

impl RecomputeJobs {
    pub fn new(max_tracked: usize) -> Self {
        Self {
            jobs: DashMap::new(),
            max_tracked: max_tracked.max(1),
        }
    }

    fn register(&self, subject_id: i64) -> Uuid {
        let job_id = Uuid::new_v4();
        self.jobs.insert(
            job_id,
            RecomputeJob {
                job_id,
                subject_id,
                status: JobStatus::Queued,
                queued_at: Utc::now(),
                started_at: None,
                finished_at: None,
                report: None,
                error: None,
            },
        );
        job_id
    }

    fn mark_running(&self, job_id: Uuid) {
        if let Some(mut job) = self.jobs.get_mut(&job_id) {
            job.status = JobStatus::Running;
            job.started_at = Some(Utc::now());
        }
    }

    fn finish(&self, job_id: Uuid, result: &Result<SubjectRecomputeReport>) {
        if let Some(mut job) = self.jobs.get_mut(&job_id) {
            job.finished_at = Some(Utc::now());
            match result {
                Ok(report) => {
                    job.status = JobStatus::Succeeded;
                    job.report = Some(report.clone());
                }
                Err(e) => {
                    job.status = JobStatus::Failed;
                    job.error = Some(e.to_string());
                }
            }
        }
        self.prune();
    }

    /// 淘汰最早结束的任务，运行中的任务不受影响
    fn prune(&self) {
        let mut finished: Vec<(chrono::DateTime<Utc>, Uuid)> = self
            .jobs
            .iter()
            .filter(|job| job.status.is_finished())
            .map(|job| (job.finished_at.unwrap_or(job.queued_at), job.job_id))
            .collect();

        if finished.len() <= self.max_tracked {
            return;
        }

        finished.sort();
        let excess = finished.len() - self.max_tracked;
        for (_, job_id) in finished.into_iter().take(excess) {
            self.jobs.remove(&job_id);
        }
    }

    pub fn get(&self, job_id: &Uuid) -> Option<RecomputeJob> {
        self.jobs.get(job_id).map(|job| job.clone())
    }

    /// 最近的任务在前
    pub fn list(&self) -> Vec<RecomputeJob> {
        let mut jobs: Vec<RecomputeJob> = self.jobs.iter().map(|job| job.clone()).collect();
        jobs.sort_by(|a, b| b.queued_at.cmp(&a.queued_at));
        jobs
    }
}

impl ScoringService {
    /// 在后台执行科目重算并登记任务
    pub fn spawn_subject_recompute(self: &Arc<Self>, subject_id: i64) -> RecomputeHandle {
        let job_id = self.jobs.register(subject_id);
        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(self);

        tokio::spawn(async move {
            service.jobs.mark_running(job_id);
            let result = service.recompute_subject(subject_id).await;

            match &result {
                Ok(report) if report.is_partial() => info!(
                    "Recompute job {} for subject {} finished with {} failures",
                    job_id,
                    subject_id,
                    report.rescale.failures.len() + report.student_failures.len()
                ),
                Ok(_) => info!("Recompute job {} for subject {} succeeded", job_id, subject_id),
                Err(e) => error!(
                    "Recompute job {} for subject {} failed: {}",
                    job_id, subject_id, e
                ),
            }

            service.jobs.finish(job_id, &result);
            // 调用方可能不关心结果
            let _ = tx.send(result);
        });

        RecomputeHandle {
            job_id,
            result: rx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScorebookError;
    use crate::services::scoring::tests::{TestBed, add_assignment};

    #[tokio::test]
    async fn test_background_job_reports_success() {
        let bed = TestBed::new().await;
        let subject = bed.subject(90.0).await;
        add_assignment(&bed, subject.id, "hw1").await;
        add_assignment(&bed, subject.id, "hw2").await;

        let handle = bed.scoring.spawn_subject_recompute(subject.id);
        let report = handle.result.await.unwrap().unwrap();
        assert_eq!(report.redistribution.score_per_assignment, 45.0);

        let job = bed.scoring.jobs().get(&handle.job_id).unwrap();
        assert_eq!(job.status, JobStatus::Succeeded);
        assert!(job.started_at.is_some());
        assert!(job.finished_at.is_some());
        assert_eq!(job.report.unwrap().subject_id, subject.id);
    }

    #[tokio::test]
    async fn test_background_job_reports_failure() {
        let bed = TestBed::new().await;

        let handle = bed.scoring.spawn_subject_recompute(12345);
        let err = handle.result.await.unwrap().unwrap_err();
        assert!(matches!(err, ScorebookError::NotFound(_)));

        let job = bed.scoring.jobs().get(&handle.job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("12345"));
    }

    #[tokio::test]
    async fn test_finished_jobs_are_pruned() {
        let jobs = RecomputeJobs::new(2);
        let ids: Vec<Uuid> = (0..4).map(|i| jobs.register(i)).collect();
        for id in &ids {
            jobs.finish(*id, &Err(ScorebookError::not_found("gone")));
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert_eq!(jobs.list().len(), 2);
        assert!(jobs.get(&ids[0]).is_none());
        assert!(jobs.get(&ids[3]).is_some());
    }
}
