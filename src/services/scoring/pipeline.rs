//! 科目重算流水线：重新分配 -> 重缩放 -> 汇总
//!
//! 整个流程在科目锁内顺序执行。中途失败时已写入的记录保持原样，
//! 重新执行即可收敛到一致状态。

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::ScoringService;
use crate::errors::{Result, ScorebookError};
use crate::models::scoring::responses::{
    RecomputeTrigger, StudentFailure, SubjectRecomputeReport,
};
use crate::models::submissions::requests::SubmissionFilter;

impl ScoringService {
    /// 完整重算一个科目
    pub async fn recompute_subject(&self, subject_id: i64) -> Result<SubjectRecomputeReport> {
        let _guard = self.locks.acquire(subject_id).await;

        let redistribution = self.redistribute_subject_scores(subject_id).await?;
        let rescale = self
            .rescale_submissions(subject_id, &redistribution.changed_assignments)
            .await?;

        // 科目下所有有提交的学生都重算，保证中断后重跑能修正总分
        let students = self.students_in_subject(subject_id).await?;
        let (students_updated, student_failures) = self.refresh_totals(&students).await;

        let report = SubjectRecomputeReport {
            subject_id,
            redistribution,
            rescale,
            students_updated,
            student_failures,
        };

        info!(
            "Recomputed subject {}: {} assignments changed, {} submissions rescaled, {} students updated",
            subject_id,
            report.redistribution.changed_assignments.len(),
            report.rescale.updated_count,
            report.students_updated
        );
        Ok(report)
    }

    /// 依次重算多个科目（去重，保持顺序）
    pub async fn recompute_subjects(
        &self,
        subject_ids: &[i64],
    ) -> Result<Vec<SubjectRecomputeReport>> {
        let mut seen = BTreeSet::new();
        let mut reports = Vec::new();
        for subject_id in subject_ids {
            if seen.insert(*subject_id) {
                reports.push(self.recompute_subject(*subject_id).await?);
            }
        }
        Ok(reports)
    }

    /// 作业变更后触发重算：按配置在后台执行或在当前请求内完成
    pub async fn trigger_recompute(
        self: &Arc<Self>,
        subject_ids: &[i64],
    ) -> Result<RecomputeTrigger> {
        if self.background {
            let mut seen = BTreeSet::new();
            let job_ids = subject_ids
                .iter()
                .filter(|id| seen.insert(**id))
                .map(|id| self.spawn_subject_recompute(*id).job_id)
                .collect();
            Ok(RecomputeTrigger::Background { job_ids })
        } else {
            Ok(RecomputeTrigger::Inline {
                reports: self.recompute_subjects(subject_ids).await?,
            })
        }
    }

    /// 删除科目
    ///
    /// 先软删除其作业并解除资料关联，再删除科目记录，最后重算受影响学生的总分。
    pub async fn remove_subject(&self, subject_id: i64) -> Result<SubjectRemoval> {
        let guard = self.locks.acquire(subject_id).await;

        if self.storage.get_subject_by_id(subject_id).await?.is_none() {
            drop(guard);
            self.locks.forget(subject_id);
            return Err(ScorebookError::not_found(format!(
                "科目不存在: {subject_id}"
            )));
        }

        let students = self.students_in_subject(subject_id).await?;
        let deactivated_assignments = self
            .storage
            .deactivate_subject_assignments(subject_id)
            .await?;
        let detached_documents = self.storage.detach_subject_documents(subject_id).await?;
        self.storage.delete_subject(subject_id).await?;

        let (students_updated, student_failures) = self.refresh_totals(&students).await;
        info!(
            "Deleted subject {}: {} assignments deactivated, {} documents detached",
            subject_id, deactivated_assignments, detached_documents
        );

        // 科目已删除，释放对应的锁
        drop(guard);
        self.locks.forget(subject_id);

        Ok(SubjectRemoval {
            subject_id,
            deactivated_assignments,
            detached_documents,
            students_updated,
            student_failures,
        })
    }

    async fn students_in_subject(&self, subject_id: i64) -> Result<BTreeSet<i64>> {
        Ok(self
            .storage
            .list_submissions(SubmissionFilter::by_subject(subject_id))
            .await?
            .into_iter()
            .map(|s| s.student_id)
            .collect())
    }

    async fn refresh_totals(&self, students: &BTreeSet<i64>) -> (usize, Vec<StudentFailure>) {
        let mut updated = 0;
        let mut failures = Vec::new();
        for student_id in students {
            match self.recalculate_student_total(*student_id, None).await {
                Ok(_) => updated += 1,
                Err(e) => {
                    warn!("重算学生 {} 总分失败: {}", student_id, e);
                    failures.push(StudentFailure {
                        student_id: *student_id,
                        error: e.to_string(),
                    });
                }
            }
        }
        (updated, failures)
    }
}

/// 科目删除结果
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SubjectRemoval {
    pub subject_id: i64,
    pub deactivated_assignments: u64,
    pub detached_documents: u64,
    pub students_updated: usize,
    pub student_failures: Vec<StudentFailure>,
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::requests::UpdateAssignmentRequest;
    use crate::models::scoring::responses::RecomputeTrigger;
    use crate::services::scoring::tests::{TestBed, add_assignment};

    #[tokio::test]
    async fn test_new_assignment_rescales_existing_submissions() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let a1 = add_assignment(&bed, subject.id, "hw1").await;
        let a2 = add_assignment(&bed, subject.id, "hw2").await;
        bed.scoring.recompute_subject(subject.id).await.unwrap();

        let full = bed.submit(subject.id, a1.id, "S1", 50.0).await;
        let half = bed.submit(subject.id, a2.id, "S1", 25.0).await;
        bed.scoring.recompute_subject(subject.id).await.unwrap();
        assert_eq!(bed.student("S1").await.total_score, 75.0);

        // 第三份作业加入后：[33, 33, 34]
        add_assignment(&bed, subject.id, "hw3").await;
        let report = bed.scoring.recompute_subject(subject.id).await.unwrap();

        assert_eq!(report.redistribution.changed_assignments.len(), 3);
        assert_eq!(report.rescale.updated_count, 2);
        assert_eq!(bed.submission_score(full).await, 33.0);
        // 25 / 50 * 33 = 16.5 -> 17
        assert_eq!(bed.submission_score(half).await, 17.0);
        assert_eq!(bed.student("S1").await.total_score, 50.0);
        assert!(!report.is_partial());
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let a1 = add_assignment(&bed, subject.id, "hw1").await;
        add_assignment(&bed, subject.id, "hw2").await;
        add_assignment(&bed, subject.id, "hw3").await;
        bed.scoring.recompute_subject(subject.id).await.unwrap();
        bed.submit(subject.id, a1.id, "S1", 33.0).await;

        let again = bed.scoring.recompute_subject(subject.id).await.unwrap();
        assert!(again.redistribution.changed_assignments.is_empty());
        assert_eq!(again.rescale.updated_count, 0);
        assert_eq!(bed.student("S1").await.total_score, 33.0);
    }

    #[tokio::test]
    async fn test_soft_delete_redistributes() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let a1 = add_assignment(&bed, subject.id, "hw1").await;
        let a2 = add_assignment(&bed, subject.id, "hw2").await;
        bed.scoring.recompute_subject(subject.id).await.unwrap();
        let submission = bed.submit(subject.id, a2.id, "S1", 50.0).await;

        bed.storage.deactivate_assignment(a1.id).await.unwrap();
        bed.scoring.recompute_subject(subject.id).await.unwrap();

        assert_eq!(bed.active_scores(subject.id).await, vec![100.0]);
        assert_eq!(bed.submission_score(submission).await, 100.0);
        assert_eq!(bed.student("S1").await.total_score, 100.0);
    }

    #[tokio::test]
    async fn test_zero_score_on_zero_point_assignment_stays_zero() {
        let bed = TestBed::new().await;
        let subject = bed.subject(2.0).await;
        let a1 = add_assignment(&bed, subject.id, "hw1").await;
        add_assignment(&bed, subject.id, "hw2").await;
        let a3 = add_assignment(&bed, subject.id, "hw3").await;
        bed.scoring.recompute_subject(subject.id).await.unwrap();
        assert_eq!(bed.active_scores(subject.id).await, vec![0.0, 1.0, 1.0]);

        let submission = bed.submit(subject.id, a1.id, "S1", 0.0).await;
        bed.storage.deactivate_assignment(a3.id).await.unwrap();
        let report = bed.scoring.recompute_subject(subject.id).await.unwrap();

        assert_eq!(bed.active_scores(subject.id).await, vec![1.0, 1.0]);
        assert_eq!(report.rescale.updated_count, 0);
        assert_eq!(bed.submission_score(submission).await, 0.0);
        assert_eq!(bed.student("S1").await.total_score, 0.0);
    }

    #[tokio::test]
    async fn test_moving_assignment_recomputes_both_subjects() {
        let bed = TestBed::new().await;
        let math = bed.subject(100.0).await;
        let art = bed.subject(60.0).await;
        let a1 = add_assignment(&bed, math.id, "hw1").await;
        add_assignment(&bed, math.id, "hw2").await;
        add_assignment(&bed, art.id, "sketch").await;
        bed.scoring
            .recompute_subjects(&[math.id, art.id])
            .await
            .unwrap();

        bed.storage
            .update_assignment(
                a1.id,
                UpdateAssignmentRequest {
                    subject_id: Some(art.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let reports = bed
            .scoring
            .recompute_subjects(&[math.id, art.id, math.id])
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(bed.active_scores(math.id).await, vec![100.0]);
        assert_eq!(bed.active_scores(art.id).await, vec![30.0, 30.0]);
    }

    #[tokio::test]
    async fn test_inline_trigger_returns_reports() {
        let bed = TestBed::inline().await;
        let subject = bed.subject(10.0).await;
        add_assignment(&bed, subject.id, "hw1").await;
        add_assignment(&bed, subject.id, "hw2").await;
        add_assignment(&bed, subject.id, "hw3").await;

        match bed.scoring.trigger_recompute(&[subject.id]).await.unwrap() {
            RecomputeTrigger::Inline { reports } => {
                assert_eq!(reports.len(), 1);
                assert_eq!(reports[0].redistribution.score_per_assignment, 3.0);
            }
            other => panic!("expected inline recompute, got {other:?}"),
        }
        assert_eq!(bed.active_scores(subject.id).await, vec![3.0, 3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_remove_subject_refreshes_totals() {
        let bed = TestBed::new().await;
        let math = bed.subject(100.0).await;
        let art = bed.subject(100.0).await;
        let hw = add_assignment(&bed, math.id, "hw").await;
        let sketch = add_assignment(&bed, art.id, "sketch").await;
        bed.submit(math.id, hw.id, "S1", 40.0).await;
        bed.submit(art.id, sketch.id, "S1", 30.0).await;
        let student = bed.student("S1").await;
        bed.scoring
            .recalculate_student_total(student.id, None)
            .await
            .unwrap();
        assert_eq!(bed.student("S1").await.total_score, 70.0);

        let removal = bed.scoring.remove_subject(math.id).await.unwrap();
        assert_eq!(removal.deactivated_assignments, 1);
        assert_eq!(removal.students_updated, 1);
        assert_eq!(bed.student("S1").await.total_score, 30.0);
        assert!(bed.storage.get_subject_by_id(math.id).await.unwrap().is_none());
        // 已删除科目的锁被释放
        assert!(bed.scoring.locks.is_empty());
    }
}
