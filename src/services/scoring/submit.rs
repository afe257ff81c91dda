//! 学生提交作业（按 学生 + 作业 覆盖写入）

use tracing::info;

use super::{SCORE_EPSILON, ScoringService};
use crate::errors::{Result, ScorebookError};
use crate::models::submissions::{
    requests::{NewSubmission, ResubmitSubmission, SubmitAssignmentRequest},
    responses::SubmissionReceipt,
};

impl ScoringService {
    /// 记录一次提交
    ///
    /// 同一学生对同一作业只保留一条提交，重复提交原地覆盖。
    /// 未指定分数时按作业当前分值给满分，指定的分数限制在 `[0, 作业分值]`。
    /// 学生总分通过增量方式更新，整个过程依次持有科目锁和学生锁。
    pub async fn record_submission(
        &self,
        req: SubmitAssignmentRequest,
    ) -> Result<SubmissionReceipt> {
        if req.file_name.trim().is_empty() || req.file_url.trim().is_empty() {
            return Err(ScorebookError::validation("file_name 和 file_url 不能为空"));
        }
        if req.score.is_some_and(|s| !s.is_finite()) {
            return Err(ScorebookError::validation("score 必须是有效数字"));
        }

        let _subject_guard = self.locks.acquire(req.subject_id).await;
        // 提交写入和总分增量在同一把学生锁内完成
        let _student_guard = self.student_locks.acquire(req.student_id).await;

        let student = self
            .storage
            .get_student_by_id(req.student_id)
            .await?
            .ok_or_else(|| ScorebookError::not_found(format!("学生不存在: {}", req.student_id)))?;

        let assignment = self
            .storage
            .get_assignment_by_id(req.assignment_id)
            .await?
            .ok_or_else(|| {
                ScorebookError::not_found(format!("作业不存在: {}", req.assignment_id))
            })?;

        if !assignment.is_active {
            return Err(ScorebookError::validation(format!(
                "作业 {} 已删除，不能提交",
                assignment.id
            )));
        }
        if assignment.subject_id != req.subject_id {
            return Err(ScorebookError::validation(format!(
                "作业 {} 不属于科目 {}",
                assignment.id, req.subject_id
            )));
        }

        let score = req
            .score
            .map(|s| s.clamp(0.0, assignment.score.max(0.0)))
            .unwrap_or(assignment.score);

        let existing = self
            .storage
            .get_submission_by_student_and_assignment(student.id, assignment.id)
            .await?;

        let (submission, created, score_change) = match existing {
            Some(previous) => {
                let updated = self
                    .storage
                    .resubmit_submission(
                        previous.id,
                        ResubmitSubmission {
                            file_name: req.file_name,
                            file_url: req.file_url,
                            score,
                        },
                    )
                    .await?
                    .ok_or_else(|| {
                        ScorebookError::not_found(format!("提交不存在: {}", previous.id))
                    })?;
                (updated, false, score - previous.score)
            }
            None => {
                let created = self
                    .storage
                    .create_submission(NewSubmission {
                        student_id: student.id,
                        assignment_id: assignment.id,
                        subject_id: req.subject_id,
                        file_name: req.file_name,
                        file_url: req.file_url,
                        score,
                    })
                    .await?;
                (created, true, score)
            }
        };

        let student_total = if score_change.abs() < SCORE_EPSILON {
            student.total_score
        } else {
            self.add_to_student_total(student.id, score_change)
                .await?
                .new_total
        };

        info!(
            "Student {} {} assignment {} (score {}, total {})",
            student.id,
            if created { "submitted" } else { "resubmitted" },
            assignment.id,
            score,
            student_total
        );

        Ok(SubmissionReceipt {
            submission,
            created,
            score_change,
            student_total,
        })
    }
}
