//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod documents;
mod students;
mod subjects;
mod submissions;

use crate::config::DatabaseConfig;
use crate::errors::{Result, ScorebookError};
use crate::utils::retry::RetryPolicy;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    pub(crate) retry: RetryPolicy,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ScorebookError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self {
            db,
            retry: RetryPolicy::from_config(config),
        })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ScorebookError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout));
        // 内存库随连接关闭而消失，不能回收空闲连接
        pool = if in_memory {
            pool.idle_timeout(None).max_lifetime(None)
        } else {
            pool.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| ScorebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ScorebookError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ScorebookError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, memory://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    pub(crate) async fn ping_impl(&self) -> Result<()> {
        let db = &self.db;
        self.retry.run("数据库健康检查", || db.ping()).await
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentFilter, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    documents::{entities::Document, requests::CreateDocumentRequest},
    students::{entities::Student, requests::CreateStudentRequest},
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, UpdateSubjectRequest},
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, ResubmitSubmission, SubmissionFilter},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 科目模块
    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn set_subject_distribution(
        &self,
        id: i64,
        total_assignments: i32,
        score_per_assignment: f64,
    ) -> Result<bool> {
        self.set_subject_distribution_impl(id, total_assignments, score_per_assignment)
            .await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 学生模块
    async fn list_students(&self) -> Result<Vec<Student>> {
        self.list_students_impl().await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>> {
        self.get_student_by_code_impl(student_code).await
    }

    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn set_student_total_score(&self, id: i64, total_score: f64) -> Result<bool> {
        self.set_student_total_score_impl(id, total_score).await
    }

    // 作业模块
    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
        self.list_assignments_impl(filter).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        score: f64,
    ) -> Result<Assignment> {
        self.create_assignment_impl(assignment, score).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn set_assignment_score(&self, id: i64, score: f64) -> Result<bool> {
        self.set_assignment_score_impl(id, score).await
    }

    async fn deactivate_assignment(&self, id: i64) -> Result<bool> {
        self.deactivate_assignment_impl(id).await
    }

    async fn deactivate_subject_assignments(&self, subject_id: i64) -> Result<u64> {
        self.deactivate_subject_assignments_impl(subject_id).await
    }

    // 提交模块
    async fn list_submissions(&self, filter: SubmissionFilter) -> Result<Vec<Submission>> {
        self.list_submissions_impl(filter).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_student_and_assignment(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_student_and_assignment_impl(student_id, assignment_id)
            .await
    }

    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn resubmit_submission(
        &self,
        id: i64,
        update: ResubmitSubmission,
    ) -> Result<Option<Submission>> {
        self.resubmit_submission_impl(id, update).await
    }

    async fn set_submission_score(&self, id: i64, score: f64) -> Result<bool> {
        self.set_submission_score_impl(id, score).await
    }

    async fn move_assignment_submissions(
        &self,
        assignment_id: i64,
        subject_id: i64,
    ) -> Result<u64> {
        self.move_assignment_submissions_impl(assignment_id, subject_id)
            .await
    }

    // 教学资料模块
    async fn list_documents(&self, subject_id: Option<i64>) -> Result<Vec<Document>> {
        self.list_documents_impl(subject_id).await
    }

    async fn create_document(&self, document: CreateDocumentRequest) -> Result<Document> {
        self.create_document_impl(document).await
    }

    async fn delete_document(&self, id: i64) -> Result<bool> {
        self.delete_document_impl(id).await
    }

    async fn detach_subject_documents(&self, subject_id: i64) -> Result<u64> {
        self.detach_subject_documents_impl(subject_id).await
    }

    async fn ping(&self) -> Result<()> {
        self.ping_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("scorebook.db").unwrap(),
            "sqlite://scorebook.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://localhost/scores").unwrap(),
            "postgres://localhost/scores"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }
}
