//! 科目存储操作

use super::SeaOrmStorage;
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::Result;
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, DEFAULT_MAX_SCORE, UpdateSubjectRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出全部科目
    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let db = &self.db;
        let results = self
            .retry
            .run("查询科目列表失败", || {
                Subjects::find()
                    .order_by_asc(Column::CreatedAt)
                    .order_by_asc(Column::Id)
                    .all(db)
            })
            .await?;

        Ok(results.into_iter().map(|m| m.into_subject()).collect())
    }

    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let db = &self.db;
        let result = self
            .retry
            .run("查询科目失败", || Subjects::find_by_id(id).one(db))
            .await?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 创建科目，分配字段初始为 0
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            class_name: Set(req.class_name),
            max_score: Set(req.max_score.unwrap_or(DEFAULT_MAX_SCORE)),
            total_assignments: Set(0),
            score_per_assignment: Set(0.0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let db = &self.db;
        let result = self
            .retry
            .run("创建科目失败", || model.clone().insert(db))
            .await?;

        Ok(result.into_subject())
    }

    /// 更新科目基本信息
    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        // 先检查科目是否存在
        let existing = self.get_subject_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(class_name) = update.class_name {
            model.class_name = Set(class_name);
        }

        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }

        let db = &self.db;
        self.retry
            .run("更新科目失败", || model.clone().update(db))
            .await?;

        self.get_subject_by_id_impl(id).await
    }

    /// 写入分配结果
    pub async fn set_subject_distribution_impl(
        &self,
        id: i64,
        total_assignments: i32,
        score_per_assignment: f64,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let db = &self.db;

        let result = self
            .retry
            .run("更新科目分配失败", || {
                Subjects::update_many()
                    .col_expr(
                        Column::TotalAssignments,
                        sea_orm::sea_query::Expr::value(total_assignments),
                    )
                    .col_expr(
                        Column::ScorePerAssignment,
                        sea_orm::sea_query::Expr::value(score_per_assignment),
                    )
                    .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                    .filter(Column::Id.eq(id))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// 删除科目（作业与提交由外键级联删除）
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let db = &self.db;
        let result = self
            .retry
            .run("删除科目失败", || Subjects::delete_by_id(id).exec(db))
            .await?;

        Ok(result.rows_affected > 0)
    }
}
