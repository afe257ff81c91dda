//! 作业分值重新分配
//!
//! 科目满分按有效作业数量平均分配：每份作业得 `floor(max / n)`，
//! 余数以 1 分为单位从最后一份作业往前补齐，保证总和恰好等于满分。

use tracing::{debug, info};

use super::{SCORE_EPSILON, ScoringService};
use crate::errors::{Result, ScorebookError};
use crate::models::assignments::requests::AssignmentFilter;
use crate::models::scoring::{entities::AssignmentScoreChange, responses::Redistribution};

/// 计算 n 份作业的分值，返回 (基础分值, 按顺序排列的分值)
pub fn distribute(max_score: f64, n: usize) -> (f64, Vec<f64>) {
    if n == 0 {
        return (0.0, Vec::new());
    }

    let base = (max_score / n as f64).floor();
    let remainder = (max_score - base * n as f64).round().max(0.0) as usize;
    let scores = (0..n)
        .map(|i| if i + remainder >= n { base + 1.0 } else { base })
        .collect();
    (base, scores)
}

impl ScoringService {
    /// 重新分配科目下所有有效作业的分值
    ///
    /// 只写入实际发生变化的作业，重复执行不会产生新的变化。
    pub async fn redistribute_subject_scores(&self, subject_id: i64) -> Result<Redistribution> {
        let subject = self
            .storage
            .get_subject_by_id(subject_id)
            .await?
            .ok_or_else(|| ScorebookError::not_found(format!("科目不存在: {subject_id}")))?;

        let assignments = self
            .storage
            .list_assignments(AssignmentFilter::active_in_subject(subject_id))
            .await?;

        let (base, scores) = distribute(subject.max_score, assignments.len());
        let total_assignments = assignments.len() as i32;

        self.storage
            .set_subject_distribution(subject_id, total_assignments, base)
            .await?;

        let mut changed_assignments = Vec::new();
        for (assignment, new_score) in assignments.iter().zip(scores) {
            if (assignment.score - new_score).abs() < SCORE_EPSILON {
                continue;
            }

            self.storage
                .set_assignment_score(assignment.id, new_score)
                .await?;
            debug!(
                "Assignment {} score {} -> {}",
                assignment.id, assignment.score, new_score
            );
            changed_assignments.push(AssignmentScoreChange {
                assignment_id: assignment.id,
                old_score: assignment.score,
                new_score,
            });
        }

        info!(
            "Redistributed subject {}: {} assignments, base {}, {} changed",
            subject_id,
            total_assignments,
            base,
            changed_assignments.len()
        );

        Ok(Redistribution {
            subject_id,
            total_assignments,
            score_per_assignment: base,
            changed_assignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::tests::{TestBed, add_assignment};

    #[test]
    fn test_distribute_remainder_goes_last() {
        assert_eq!(distribute(100.0, 3), (33.0, vec![33.0, 33.0, 34.0]));
        assert_eq!(distribute(100.0, 6), (16.0, vec![16.0, 16.0, 17.0, 17.0, 17.0, 17.0]));
        assert_eq!(distribute(2.0, 3), (0.0, vec![0.0, 1.0, 1.0]));
        assert_eq!(distribute(100.0, 0), (0.0, vec![]));
    }

    #[test]
    fn test_distribute_sums_to_max() {
        for n in 1..=40 {
            let (_, scores) = distribute(100.0, n);
            assert_eq!(scores.iter().sum::<f64>(), 100.0, "n = {n}");
        }
    }

    #[tokio::test]
    async fn test_redistribute_three_assignments_is_idempotent() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        for title in ["hw1", "hw2", "hw3"] {
            add_assignment(&bed, subject.id, title).await;
        }

        let first = bed.scoring.redistribute_subject_scores(subject.id).await.unwrap();
        assert_eq!(first.total_assignments, 3);
        assert_eq!(first.score_per_assignment, 33.0);
        assert_eq!(bed.active_scores(subject.id).await, vec![33.0, 33.0, 34.0]);

        let second = bed.scoring.redistribute_subject_scores(subject.id).await.unwrap();
        assert!(second.changed_assignments.is_empty());
        assert_eq!(bed.active_scores(subject.id).await, vec![33.0, 33.0, 34.0]);
    }

    #[tokio::test]
    async fn test_redistribute_without_assignments_resets_subject() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;

        let result = bed.scoring.redistribute_subject_scores(subject.id).await.unwrap();
        assert_eq!(result.total_assignments, 0);
        assert_eq!(result.score_per_assignment, 0.0);
        assert!(result.changed_assignments.is_empty());

        let stored = bed.storage.get_subject_by_id(subject.id).await.unwrap().unwrap();
        assert_eq!(stored.total_assignments, 0);
        assert_eq!(stored.score_per_assignment, 0.0);
    }

    #[tokio::test]
    async fn test_redistribute_missing_subject() {
        let bed = TestBed::new().await;
        let err = bed.scoring.redistribute_subject_scores(404).await.unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_inactive_assignments_are_ignored() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let first = add_assignment(&bed, subject.id, "hw1").await;
        add_assignment(&bed, subject.id, "hw2").await;
        bed.storage.deactivate_assignment(first.id).await.unwrap();

        let result = bed.scoring.redistribute_subject_scores(subject.id).await.unwrap();
        assert_eq!(result.total_assignments, 1);
        assert_eq!(bed.active_scores(subject.id).await, vec![100.0]);
    }
}
