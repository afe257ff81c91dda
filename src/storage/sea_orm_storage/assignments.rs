//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::Result;
use crate::models::assignments::{
    entities::Assignment,
    requests::{AssignmentFilter, CreateAssignmentRequest, UpdateAssignmentRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出作业，按 (创建时间, ID) 升序
    pub async fn list_assignments_impl(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
        let db = &self.db;
        let results = self
            .retry
            .run("查询作业列表失败", || {
                let mut select = Assignments::find();

                // 科目筛选
                if let Some(subject_id) = filter.subject_id {
                    select = select.filter(Column::SubjectId.eq(subject_id));
                }

                if filter.active_only {
                    select = select.filter(Column::IsActive.eq(true));
                }

                select
                    .order_by_asc(Column::CreatedAt)
                    .order_by_asc(Column::Id)
                    .all(db)
            })
            .await?;

        Ok(results.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 通过 ID 获取作业（包括已软删除的）
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let db = &self.db;
        let result = self
            .retry
            .run("查询作业失败", || Assignments::find_by_id(id).one(db))
            .await?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        req: CreateAssignmentRequest,
        score: f64,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.map(|dt| dt.timestamp())),
            score: Set(score),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let db = &self.db;
        let result = self
            .retry
            .run("创建作业失败", || model.clone().insert(db))
            .await?;

        Ok(result.into_assignment())
    }

    /// 更新作业基本信息
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let existing = self.get_assignment_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(subject_id);
        }

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }

        let db = &self.db;
        self.retry
            .run("更新作业失败", || model.clone().update(db))
            .await?;

        self.get_assignment_by_id_impl(id).await
    }

    /// 写入作业分值
    pub async fn set_assignment_score_impl(&self, id: i64, score: f64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let db = &self.db;

        let result = self
            .retry
            .run("更新作业分值失败", || {
                Assignments::update_many()
                    .col_expr(Column::Score, sea_orm::sea_query::Expr::value(score))
                    .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                    .filter(Column::Id.eq(id))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// 软删除作业
    pub async fn deactivate_assignment_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let db = &self.db;

        let result = self
            .retry
            .run("删除作业失败", || {
                Assignments::update_many()
                    .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
                    .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                    .filter(Column::Id.eq(id))
                    .filter(Column::IsActive.eq(true))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// 软删除科目下全部作业
    pub async fn deactivate_subject_assignments_impl(&self, subject_id: i64) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        let db = &self.db;

        let result = self
            .retry
            .run("批量删除作业失败", || {
                Assignments::update_many()
                    .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
                    .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                    .filter(Column::SubjectId.eq(subject_id))
                    .filter(Column::IsActive.eq(true))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected)
    }
}
