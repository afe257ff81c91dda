//! 学生总分汇总
//!
//! 学生总分是其全部提交分数之和，落库在 `Student.total_score`；
//! 按科目的小计只是派生视图，不写回存储。

use std::collections::BTreeMap;

use tracing::{info, warn};

use super::ScoringService;
use crate::errors::{Result, ScorebookError};
use crate::models::scoring::responses::{RosterRecalculation, StudentFailure, StudentTotal};
use crate::models::students::{
    entities::Student,
    responses::{StudentScoresResponse, SubjectScoreLine},
};
use crate::models::submissions::requests::SubmissionFilter;

impl ScoringService {
    pub(super) async fn require_student(&self, student_id: i64) -> Result<Student> {
        self.storage
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| ScorebookError::not_found(format!("学生不存在: {student_id}")))
    }

    /// 重算学生总分
    ///
    /// 不指定科目时汇总全部提交并落库；指定科目时只返回该科目小计。
    pub async fn recalculate_student_total(
        &self,
        student_id: i64,
        scope_subject_id: Option<i64>,
    ) -> Result<StudentTotal> {
        self.require_student(student_id).await?;

        if scope_subject_id.is_none() {
            let _guard = self.student_locks.acquire(student_id).await;
            let new_total = self.persist_student_total(student_id).await?;
            return Ok(StudentTotal {
                student_id,
                new_total,
                scope_subject_id: None,
                persisted: true,
            });
        }

        let filter = SubmissionFilter {
            student_id: Some(student_id),
            subject_id: scope_subject_id,
            ..Default::default()
        };
        let new_total: f64 = self
            .storage
            .list_submissions(filter)
            .await?
            .iter()
            .map(|s| s.score)
            .sum();

        Ok(StudentTotal {
            student_id,
            new_total,
            scope_subject_id,
            persisted: false,
        })
    }

    /// 汇总学生全部提交并写入总分，调用方需持有学生锁
    async fn persist_student_total(&self, student_id: i64) -> Result<f64> {
        let new_total: f64 = self
            .storage
            .list_submissions(SubmissionFilter::by_student(student_id))
            .await?
            .iter()
            .map(|s| s.score)
            .sum();

        self.storage
            .set_student_total_score(student_id, new_total)
            .await?;
        Ok(new_total)
    }

    /// 重算全部学生的总分，单个学生失败不影响其他学生
    pub async fn recalculate_all_student_totals(&self) -> Result<RosterRecalculation> {
        let students = self.storage.list_students().await?;

        let mut result = RosterRecalculation::default();
        for student in students {
            let _guard = self.student_locks.acquire(student.id).await;
            match self.persist_student_total(student.id).await {
                Ok(_) => result.updated_count += 1,
                Err(e) => {
                    warn!("更新学生 {} 总分失败: {}", student.id, e);
                    result.failures.push(StudentFailure {
                        student_id: student.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Recalculated totals for {} students ({} failed)",
            result.updated_count,
            result.failures.len()
        );
        Ok(result)
    }

    /// 增量更新学生总分
    ///
    /// 非幂等，每次分数变化只能调用一次。
    pub async fn apply_score_delta(&self, student_id: i64, delta: f64) -> Result<StudentTotal> {
        let _guard = self.student_locks.acquire(student_id).await;
        self.add_to_student_total(student_id, delta).await
    }

    /// 在已持有学生锁的前提下累加总分
    pub(super) async fn add_to_student_total(
        &self,
        student_id: i64,
        delta: f64,
    ) -> Result<StudentTotal> {
        let student = self.require_student(student_id).await?;
        let new_total = student.total_score + delta;

        self.storage
            .set_student_total_score(student_id, new_total)
            .await?;

        Ok(StudentTotal {
            student_id,
            new_total,
            scope_subject_id: None,
            persisted: true,
        })
    }

    /// 学生各科目得分概览
    pub async fn student_scores(&self, student_id: i64) -> Result<StudentScoresResponse> {
        let student = self.require_student(student_id).await?;
        let submissions = self
            .storage
            .list_submissions(SubmissionFilter::by_student(student_id))
            .await?;

        let mut per_subject: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
        for submission in &submissions {
            let entry = per_subject.entry(submission.subject_id).or_default();
            entry.0 += submission.score;
            entry.1 += 1;
        }

        let subjects = self.storage.list_subjects().await?;
        let lines = per_subject
            .into_iter()
            .map(|(subject_id, (earned, submission_count))| {
                let subject = subjects.iter().find(|s| s.id == subject_id);
                SubjectScoreLine {
                    subject_id,
                    subject_name: subject.map(|s| s.name.clone()).unwrap_or_default(),
                    max_score: subject.map(|s| s.max_score).unwrap_or_default(),
                    earned,
                    submission_count,
                }
            })
            .collect();

        Ok(StudentScoresResponse {
            student_id,
            student_code: student.student_code,
            total_score: student.total_score,
            subjects: lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::services::scoring::tests::{TestBed, add_assignment};

    #[tokio::test]
    async fn test_total_is_sum_of_submissions() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let a1 = add_assignment(&bed, subject.id, "hw1").await;
        let a2 = add_assignment(&bed, subject.id, "hw2").await;
        let a3 = add_assignment(&bed, subject.id, "hw3").await;
        bed.submit(subject.id, a1.id, "S1", 20.0).await;
        bed.submit(subject.id, a2.id, "S1", 15.0).await;
        bed.submit(subject.id, a3.id, "S1", 0.0).await;
        let student = bed.student("S1").await;

        let total = bed
            .scoring
            .recalculate_student_total(student.id, None)
            .await
            .unwrap();
        assert_eq!(total.new_total, 35.0);
        assert!(total.persisted);
        assert_eq!(bed.student("S1").await.total_score, 35.0);
    }

    #[tokio::test]
    async fn test_scoped_subtotal_is_not_persisted() {
        let bed = TestBed::new().await;
        let math = bed.subject(100.0).await;
        let art = bed.subject(50.0).await;
        let hw = add_assignment(&bed, math.id, "hw").await;
        let sketch = add_assignment(&bed, art.id, "sketch").await;
        bed.submit(math.id, hw.id, "S1", 30.0).await;
        bed.submit(art.id, sketch.id, "S1", 12.0).await;
        let student = bed.student("S1").await;

        let scoped = bed
            .scoring
            .recalculate_student_total(student.id, Some(art.id))
            .await
            .unwrap();
        assert_eq!(scoped.new_total, 12.0);
        assert!(!scoped.persisted);
        assert_eq!(bed.student("S1").await.total_score, 0.0);

        let scores = bed.scoring.student_scores(student.id).await.unwrap();
        assert_eq!(scores.subjects.len(), 2);
        assert_eq!(scores.subjects[0].earned, 30.0);
        assert_eq!(scores.subjects[1].subject_name, art.name);
    }

    #[tokio::test]
    async fn test_missing_student() {
        let bed = TestBed::new().await;
        let err = bed
            .scoring
            .recalculate_student_total(999, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_roster_recalculation_and_delta() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let hw = add_assignment(&bed, subject.id, "hw").await;
        bed.submit(subject.id, hw.id, "S1", 40.0).await;
        bed.submit(subject.id, hw.id, "S2", 10.0).await;
        bed.student("S3").await;

        let roster = bed.scoring.recalculate_all_student_totals().await.unwrap();
        assert_eq!(roster.updated_count, 3);
        assert!(roster.failures.is_empty());
        assert_eq!(bed.student("S1").await.total_score, 40.0);
        assert_eq!(bed.student("S3").await.total_score, 0.0);

        let s2 = bed.student("S2").await;
        let total = bed.scoring.apply_score_delta(s2.id, 5.0).await.unwrap();
        assert_eq!(total.new_total, 15.0);
        assert_eq!(bed.student("S2").await.total_score, 15.0);
    }
}
