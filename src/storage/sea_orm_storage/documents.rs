//! 教学资料存储操作

use super::SeaOrmStorage;
use crate::entity::documents::{ActiveModel, Column, Entity as Documents};
use crate::errors::Result;
use crate::models::documents::{entities::Document, requests::CreateDocumentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn list_documents_impl(&self, subject_id: Option<i64>) -> Result<Vec<Document>> {
        let db = &self.db;
        let results = self
            .retry
            .run("查询资料列表失败", || {
                let mut select = Documents::find();
                if let Some(subject_id) = subject_id {
                    select = select.filter(Column::SubjectId.eq(subject_id));
                }
                select
                    .order_by_desc(Column::UploadedAt)
                    .order_by_desc(Column::Id)
                    .all(db)
            })
            .await?;

        Ok(results.into_iter().map(|m| m.into_document()).collect())
    }

    pub async fn create_document_impl(&self, req: CreateDocumentRequest) -> Result<Document> {
        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            description: Set(req.description),
            file_url: Set(req.file_url),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let db = &self.db;
        let result = self
            .retry
            .run("创建资料失败", || model.clone().insert(db))
            .await?;

        Ok(result.into_document())
    }

    pub async fn delete_document_impl(&self, id: i64) -> Result<bool> {
        let db = &self.db;
        let result = self
            .retry
            .run("删除资料失败", || Documents::delete_by_id(id).exec(db))
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// 解除科目与资料的关联
    pub async fn detach_subject_documents_impl(&self, subject_id: i64) -> Result<u64> {
        let db = &self.db;
        let result = self
            .retry
            .run("解除资料关联失败", || {
                Documents::update_many()
                    .col_expr(
                        Column::SubjectId,
                        sea_orm::sea_query::Expr::value(Option::<i64>::None),
                    )
                    .filter(Column::SubjectId.eq(subject_id))
                    .exec(db)
            })
            .await?;

        Ok(result.rows_affected)
    }
}
