use std::sync::Arc;

use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
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

use crate::errors::Result;

pub mod cached;
pub mod memory_storage;
pub mod sea_orm_storage;

/// 记录存储接口
///
/// 计分引擎只依赖这个接口，具体后端（关系型数据库、内存）由适配器实现。
/// `get_*` 找不到记录时返回 `Ok(None)`，更新/删除返回是否命中。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 科目管理方法
    // 列出科目（按创建时间升序）
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    // 通过ID获取科目
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    // 创建科目
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    // 更新科目基本信息
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    // 写入分配结果（作业数量、每份作业分值）
    async fn set_subject_distribution(
        &self,
        id: i64,
        total_assignments: i32,
        score_per_assignment: f64,
    ) -> Result<bool>;
    // 删除科目
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 学生管理方法
    // 列出学生（按学号升序）
    async fn list_students(&self) -> Result<Vec<Student>>;
    // 通过ID获取学生
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 通过学号获取学生
    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>>;
    // 创建学生
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    // 写入学生总分
    async fn set_student_total_score(&self, id: i64, total_score: f64) -> Result<bool>;

    /// 作业管理方法
    // 列出作业（按创建时间、ID 升序）
    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 创建作业，score 为占位分值
    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        score: f64,
    ) -> Result<Assignment>;
    // 更新作业基本信息
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 写入作业分值
    async fn set_assignment_score(&self, id: i64, score: f64) -> Result<bool>;
    // 软删除作业
    async fn deactivate_assignment(&self, id: i64) -> Result<bool>;
    // 软删除科目下的全部作业，返回影响数量
    async fn deactivate_subject_assignments(&self, subject_id: i64) -> Result<u64>;

    /// 提交管理方法
    // 列出提交
    async fn list_submissions(&self, filter: SubmissionFilter) -> Result<Vec<Submission>>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 获取学生对某作业的提交
    async fn get_submission_by_student_and_assignment(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>>;
    // 创建提交
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 覆盖已有提交（重新提交）
    async fn resubmit_submission(
        &self,
        id: i64,
        update: ResubmitSubmission,
    ) -> Result<Option<Submission>>;
    // 写入提交分数
    async fn set_submission_score(&self, id: i64, score: f64) -> Result<bool>;
    // 作业移动到其他科目时，同步其提交的科目，返回影响数量
    async fn move_assignment_submissions(&self, assignment_id: i64, subject_id: i64)
    -> Result<u64>;

    /// 教学资料管理方法
    // 列出资料
    async fn list_documents(&self, subject_id: Option<i64>) -> Result<Vec<Document>>;
    // 创建资料
    async fn create_document(&self, document: CreateDocumentRequest) -> Result<Document>;
    // 删除资料
    async fn delete_document(&self, id: i64) -> Result<bool>;
    // 解除科目下资料的关联，返回影响数量
    async fn detach_subject_documents(&self, subject_id: i64) -> Result<u64>;

    /// 健康检查
    async fn ping(&self) -> Result<()>;
}

/// 根据配置创建存储后端，按需在外层包一层读缓存
pub async fn create_storage(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    let inner: Arc<dyn Storage> = if config.database.url.starts_with("memory://") {
        Arc::new(memory_storage::MemoryStorage::new())
    } else {
        Arc::new(sea_orm_storage::SeaOrmStorage::connect(&config.database).await?)
    };

    if config.cache_enabled() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::from_config(&config.cache));
        Ok(Arc::new(cached::CachedStorage::new(inner, cache)))
    } else {
        Ok(inner)
    }
}
