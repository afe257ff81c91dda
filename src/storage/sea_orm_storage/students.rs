//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, ScorebookError};
use crate::models::students::{entities::Student, requests::CreateStudentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn list_students_impl(&self) -> Result<Vec<Student>> {
        let db = &self.db;
        let results = self
            .retry
            .run("查询学生列表失败", || {
                Students::find().order_by_asc(Column::StudentCode).all(db)
            })
            .await?;

        Ok(results.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let db = &self.db;
        let result = self
            .retry
            .run("查询学生失败", || Students::find_by_id(id).one(db))
            .await?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_code_impl(&self, student_code: &str) -> Result<Option<Student>> {
        let db = &self.db;
        let result = self
            .retry
            .run("查询学生失败", || {
                Students::find()
                    .filter(Column::StudentCode.eq(student_code))
                    .one(db)
            })
            .await?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        if self.get_student_by_code_impl(&req.student_code).await?.is_some() {
            return Err(ScorebookError::conflict(format!(
                "学号已存在: {}",
                req.student_code
            )));
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_code: Set(req.student_code),
            name: Set(req.name),
            class_name: Set(req.class_name),
            total_score: Set(0.0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let db = &self.db;
        let result = self
            .retry
            .run("创建学生失败", || model.clone().insert(db))
            .await?;

        Ok(result.into_student())
    }

    /// 写入学生总分
    pub async fn set_student_total_score_impl(&self, id: i64, total_score: f64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let db = &self.db;

        let result = self
            .retry
            .run("更新学生总分失败", || {
                Students::update_many()
                    .col_expr(
                        Column::TotalScore,
                        sea_orm::sea_query::Expr::value(total_score),
                    )
                    .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                    .filter(Column::Id.eq(id))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected > 0)
    }
}
