//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::Result;
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{NewSubmission, ResubmitSubmission, SubmissionFilter},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出提交
    pub async fn list_submissions_impl(&self, filter: SubmissionFilter) -> Result<Vec<Submission>> {
        let db = &self.db;
        let results = self
            .retry
            .run("查询提交列表失败", || {
                let mut select = Submissions::find();

                if let Some(student_id) = filter.student_id {
                    select = select.filter(Column::StudentId.eq(student_id));
                }

                if let Some(assignment_id) = filter.assignment_id {
                    select = select.filter(Column::AssignmentId.eq(assignment_id));
                }

                if let Some(subject_id) = filter.subject_id {
                    select = select.filter(Column::SubjectId.eq(subject_id));
                }

                select.order_by_asc(Column::Id).all(db)
            })
            .await?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let db = &self.db;
        let result = self
            .retry
            .run("查询提交失败", || Submissions::find_by_id(id).one(db))
            .await?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_by_student_and_assignment_impl(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        let db = &self.db;
        let result = self
            .retry
            .run("查询提交失败", || {
                Submissions::find()
                    .filter(Column::StudentId.eq(student_id))
                    .filter(Column::AssignmentId.eq(assignment_id))
                    .one(db)
            })
            .await?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            assignment_id: Set(req.assignment_id),
            subject_id: Set(req.subject_id),
            file_name: Set(req.file_name),
            file_url: Set(req.file_url),
            score: Set(req.score),
            status: Set(SubmissionStatus::Submitted.to_string()),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let db = &self.db;
        let result = self
            .retry
            .run("创建提交失败", || model.clone().insert(db))
            .await?;

        Ok(result.into_submission())
    }

    /// 重新提交：原地覆盖文件与分数
    pub async fn resubmit_submission_impl(
        &self,
        id: i64,
        update: ResubmitSubmission,
    ) -> Result<Option<Submission>> {
        let existing = self.get_submission_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(id),
            file_name: Set(update.file_name),
            file_url: Set(update.file_url),
            score: Set(update.score),
            status: Set(SubmissionStatus::Resubmitted.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        let db = &self.db;
        self.retry
            .run("更新提交失败", || model.clone().update(db))
            .await?;

        self.get_submission_by_id_impl(id).await
    }

    /// 写入提交分数
    pub async fn set_submission_score_impl(&self, id: i64, score: f64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let db = &self.db;

        let result = self
            .retry
            .run("更新提交分数失败", || {
                Submissions::update_many()
                    .col_expr(Column::Score, sea_orm::sea_query::Expr::value(score))
                    .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                    .filter(Column::Id.eq(id))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// 同步作业下全部提交的科目
    pub async fn move_assignment_submissions_impl(
        &self,
        assignment_id: i64,
        subject_id: i64,
    ) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        let db = &self.db;

        let result = self
            .retry
            .run("同步提交科目失败", || {
                Submissions::update_many()
                    .col_expr(Column::SubjectId, sea_orm::sea_query::Expr::value(subject_id))
                    .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                    .filter(Column::AssignmentId.eq(assignment_id))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected)
    }
}
