//! 提交分数重缩放
//!
//! 作业分值变化后，按比例调整已有提交的分数。

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::{SCORE_EPSILON, ScoringService};
use crate::errors::Result;
use crate::models::scoring::{
    entities::{AssignmentScoreChange, SubmissionScoreChange},
    responses::{RescaleOutcome, SubmissionFailure},
};
use crate::models::submissions::requests::SubmissionFilter;

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < SCORE_EPSILON
}

/// 计算单条提交在作业分值从 `old` 变为 `new` 后的分数
///
/// - 零分保持零分
/// - 原分值为 0 时无法按比例换算，记为 0
/// - 满分（等于原分值）得新满分
/// - 其余按比例四舍五入，并限制在 `[0, new]` 之内
///
/// 零分与原分值为 0 的判断先于满分判断，0 分作业上的 0 分提交不会被抬高。
pub fn rescale_score(score: f64, old: f64, new: f64) -> f64 {
    if same(score, 0.0) || old <= 0.0 {
        0.0
    } else if same(score, old) {
        new
    } else {
        (score / old * new).round().clamp(0.0, new.max(0.0))
    }
}

impl ScoringService {
    /// 按作业分值变化重缩放科目下的提交分数
    ///
    /// 单条提交写入失败只记录，不中断整批处理。
    pub async fn rescale_submissions(
        &self,
        subject_id: i64,
        changes: &[AssignmentScoreChange],
    ) -> Result<RescaleOutcome> {
        let mut outcome = RescaleOutcome::default();

        for change in changes {
            if same(change.old_score, change.new_score) {
                continue;
            }

            let submissions = self
                .storage
                .list_submissions(SubmissionFilter {
                    assignment_id: Some(change.assignment_id),
                    subject_id: Some(subject_id),
                    ..Default::default()
                })
                .await?;

            for submission in submissions {
                let new_score = rescale_score(submission.score, change.old_score, change.new_score);
                if same(new_score, submission.score) {
                    continue;
                }

                match self
                    .storage
                    .set_submission_score(submission.id, new_score)
                    .await
                {
                    Ok(_) => {
                        debug!(
                            "Submission {}: {} -> {} (assignment {}: {} -> {})",
                            submission.id,
                            submission.score,
                            new_score,
                            change.assignment_id,
                            change.old_score,
                            change.new_score
                        );
                        outcome.updated_count += 1;
                        outcome.changed_submissions.push(SubmissionScoreChange {
                            submission_id: submission.id,
                            student_id: submission.student_id,
                            assignment_id: submission.assignment_id,
                            old_score: submission.score,
                            new_score,
                        });
                    }
                    Err(e) => {
                        warn!("重缩放提交 {} 失败: {}", submission.id, e);
                        outcome.failures.push(SubmissionFailure {
                            submission_id: submission.id,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        if outcome.updated_count > 0 || !outcome.failures.is_empty() {
            info!(
                "Rescaled subject {}: {} updated, {} failed",
                subject_id,
                outcome.updated_count,
                outcome.failures.len()
            );
        }

        Ok(outcome)
    }
}

impl RescaleOutcome {
    /// 分数发生变化的学生
    pub fn affected_students(&self) -> BTreeSet<i64> {
        self.changed_submissions
            .iter()
            .map(|c| c.student_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::tests::{TestBed, add_assignment};

    #[test]
    fn test_rescale_score_rules() {
        // 满分跟随新分值
        assert_eq!(rescale_score(50.0, 50.0, 40.0), 40.0);
        // 零分保持
        assert_eq!(rescale_score(0.0, 50.0, 40.0), 0.0);
        // 按比例
        assert_eq!(rescale_score(25.0, 50.0, 40.0), 20.0);
        assert_eq!(rescale_score(10.0, 33.0, 25.0), 8.0);
        // 原分值为 0
        assert_eq!(rescale_score(5.0, 0.0, 40.0), 0.0);
        // 0 分作业上的 0 分提交
        assert_eq!(rescale_score(0.0, 0.0, 40.0), 0.0);
        // 超出原分值的异常数据被限制在新分值内
        assert_eq!(rescale_score(60.0, 50.0, 40.0), 40.0);
    }

    #[tokio::test]
    async fn test_rescale_full_zero_and_partial() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let assignment = add_assignment(&bed, subject.id, "hw1").await;
        bed.storage
            .set_assignment_score(assignment.id, 50.0)
            .await
            .unwrap();

        let full = bed.submit(subject.id, assignment.id, "S1", 50.0).await;
        let zero = bed.submit(subject.id, assignment.id, "S2", 0.0).await;
        let half = bed.submit(subject.id, assignment.id, "S3", 25.0).await;

        let outcome = bed
            .scoring
            .rescale_submissions(
                subject.id,
                &[AssignmentScoreChange {
                    assignment_id: assignment.id,
                    old_score: 50.0,
                    new_score: 40.0,
                }],
            )
            .await
            .unwrap();

        // 零分不变，不计入更新
        assert_eq!(outcome.updated_count, 2);
        assert!(outcome.failures.is_empty());
        assert_eq!(bed.submission_score(full).await, 40.0);
        assert_eq!(bed.submission_score(zero).await, 0.0);
        assert_eq!(bed.submission_score(half).await, 20.0);
    }

    #[tokio::test]
    async fn test_unchanged_assignment_is_skipped() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let assignment = add_assignment(&bed, subject.id, "hw1").await;
        let submission = bed.submit(subject.id, assignment.id, "S1", 30.0).await;

        let outcome = bed
            .scoring
            .rescale_submissions(
                subject.id,
                &[AssignmentScoreChange {
                    assignment_id: assignment.id,
                    old_score: 50.0,
                    new_score: 50.0,
                }],
            )
            .await
            .unwrap();

        assert_eq!(outcome, RescaleOutcome::default());
        assert_eq!(bed.submission_score(submission).await, 30.0);
    }

    #[tokio::test]
    async fn test_write_failure_does_not_abort_batch() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let assignment = add_assignment(&bed, subject.id, "hw1").await;
        bed.storage
            .set_assignment_score(assignment.id, 50.0)
            .await
            .unwrap();

        let broken = bed.submit(subject.id, assignment.id, "S1", 50.0).await;
        let healthy = bed.submit(subject.id, assignment.id, "S2", 50.0).await;
        bed.memory.fail_submission_writes(broken);

        let outcome = bed
            .scoring
            .rescale_submissions(
                subject.id,
                &[AssignmentScoreChange {
                    assignment_id: assignment.id,
                    old_score: 50.0,
                    new_score: 25.0,
                }],
            )
            .await
            .unwrap();

        assert_eq!(outcome.updated_count, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].submission_id, broken);
        assert_eq!(bed.submission_score(healthy).await, 25.0);
        assert_eq!(bed.submission_score(broken).await, 50.0);
    }
}
