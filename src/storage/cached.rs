//! 带读缓存的存储包装器
//!
//! 列表查询结果以 JSON 形式缓存在 `ObjectCache` 中，TTL 由 `cache.default_ttl` 决定。
//! 每个集合维护一个代数计数器，经由包装器的写操作会递增相关集合的代数，
//! 因此本进程内的写入之后不会读到旧数据；其他写入方的修改在 TTL 过期后可见。

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::Result;
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Subjects = 0,
    Students = 1,
    Assignments = 2,
    Submissions = 3,
    Documents = 4,
}

impl Collection {
    fn name(self) -> &'static str {
        match self {
            Collection::Subjects => "subjects",
            Collection::Students => "students",
            Collection::Assignments => "assignments",
            Collection::Submissions => "submissions",
            Collection::Documents => "documents",
        }
    }
}

pub struct CachedStorage {
    inner: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    generations: [AtomicU64; 5],
}

impl CachedStorage {
    pub fn new(inner: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>) -> Self {
        Self {
            inner,
            cache,
            generations: Default::default(),
        }
    }

    fn generation(&self, collection: Collection) -> u64 {
        self.generations[collection as usize].load(Ordering::Acquire)
    }

    fn bump(&self, collections: &[Collection]) {
        for collection in collections {
            self.generations[*collection as usize].fetch_add(1, Ordering::AcqRel);
        }
    }

    async fn cached_list<T, F, Fut>(
        &self,
        collection: Collection,
        variant: String,
        load: F,
    ) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let key = format!(
            "{}:{}:{}",
            collection.name(),
            self.generation(collection),
            variant
        );

        if let CacheResult::Found(raw) = self.cache.get_raw(&key).await {
            match serde_json::from_str(&raw) {
                Ok(items) => return Ok(items),
                Err(e) => warn!("缓存反序列化失败 {}: {}", key, e),
            }
        }

        let items = load().await?;
        match serde_json::to_string(&items) {
            Ok(raw) => self.cache.insert_raw(key, raw, 0).await,
            Err(e) => warn!("缓存序列化失败 {}: {}", key, e),
        }
        Ok(items)
    }
}

#[async_trait]
impl Storage for CachedStorage {
    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.cached_list(Collection::Subjects, "all".to_string(), || {
            self.inner.list_subjects()
        })
        .await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.inner.get_subject_by_id(id).await
    }

    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        let result = self.inner.create_subject(subject).await;
        self.bump(&[Collection::Subjects]);
        result
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let result = self.inner.update_subject(id, update).await;
        self.bump(&[Collection::Subjects]);
        result
    }

    async fn set_subject_distribution(
        &self,
        id: i64,
        total_assignments: i32,
        score_per_assignment: f64,
    ) -> Result<bool> {
        let result = self
            .inner
            .set_subject_distribution(id, total_assignments, score_per_assignment)
            .await;
        self.bump(&[Collection::Subjects]);
        result
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        let result = self.inner.delete_subject(id).await;
        // 级联删除影响作业、提交和资料
        self.bump(&[
            Collection::Subjects,
            Collection::Assignments,
            Collection::Submissions,
            Collection::Documents,
        ]);
        result
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        self.cached_list(Collection::Students, "all".to_string(), || {
            self.inner.list_students()
        })
        .await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.inner.get_student_by_id(id).await
    }

    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>> {
        self.inner.get_student_by_code(student_code).await
    }

    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        let result = self.inner.create_student(student).await;
        self.bump(&[Collection::Students]);
        result
    }

    async fn set_student_total_score(&self, id: i64, total_score: f64) -> Result<bool> {
        let result = self.inner.set_student_total_score(id, total_score).await;
        self.bump(&[Collection::Students]);
        result
    }

    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
        let variant = format!("{:?}:{}", filter.subject_id, filter.active_only);
        self.cached_list(Collection::Assignments, variant, || {
            self.inner.list_assignments(filter)
        })
        .await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.inner.get_assignment_by_id(id).await
    }

    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        score: f64,
    ) -> Result<Assignment> {
        let result = self.inner.create_assignment(assignment, score).await;
        self.bump(&[Collection::Assignments]);
        result
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let result = self.inner.update_assignment(id, update).await;
        self.bump(&[Collection::Assignments]);
        result
    }

    async fn set_assignment_score(&self, id: i64, score: f64) -> Result<bool> {
        let result = self.inner.set_assignment_score(id, score).await;
        self.bump(&[Collection::Assignments]);
        result
    }

    async fn deactivate_assignment(&self, id: i64) -> Result<bool> {
        let result = self.inner.deactivate_assignment(id).await;
        self.bump(&[Collection::Assignments]);
        result
    }

    async fn deactivate_subject_assignments(&self, subject_id: i64) -> Result<u64> {
        let result = self.inner.deactivate_subject_assignments(subject_id).await;
        self.bump(&[Collection::Assignments]);
        result
    }

    async fn list_submissions(&self, filter: SubmissionFilter) -> Result<Vec<Submission>> {
        let variant = format!(
            "{:?}:{:?}:{:?}",
            filter.student_id, filter.assignment_id, filter.subject_id
        );
        self.cached_list(Collection::Submissions, variant, || {
            self.inner.list_submissions(filter)
        })
        .await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.inner.get_submission_by_id(id).await
    }

    async fn get_submission_by_student_and_assignment(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        self.inner
            .get_submission_by_student_and_assignment(student_id, assignment_id)
            .await
    }

    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        let result = self.inner.create_submission(submission).await;
        self.bump(&[Collection::Submissions]);
        result
    }

    async fn resubmit_submission(
        &self,
        id: i64,
        update: ResubmitSubmission,
    ) -> Result<Option<Submission>> {
        let result = self.inner.resubmit_submission(id, update).await;
        self.bump(&[Collection::Submissions]);
        result
    }

    async fn set_submission_score(&self, id: i64, score: f64) -> Result<bool> {
        let result = self.inner.set_submission_score(id, score).await;
        self.bump(&[Collection::Submissions]);
        result
    }

    async fn move_assignment_submissions(
        &self,
        assignment_id: i64,
        subject_id: i64,
    ) -> Result<u64> {
        let result = self
            .inner
            .move_assignment_submissions(assignment_id, subject_id)
            .await;
        self.bump(&[Collection::Submissions]);
        result
    }

    async fn list_documents(&self, subject_id: Option<i64>) -> Result<Vec<Document>> {
        self.cached_list(Collection::Documents, format!("{subject_id:?}"), || {
            self.inner.list_documents(subject_id)
        })
        .await
    }

    async fn create_document(&self, document: CreateDocumentRequest) -> Result<Document> {
        let result = self.inner.create_document(document).await;
        self.bump(&[Collection::Documents]);
        result
    }

    async fn delete_document(&self, id: i64) -> Result<bool> {
        let result = self.inner.delete_document(id).await;
        self.bump(&[Collection::Documents]);
        result
    }

    async fn detach_subject_documents(&self, subject_id: i64) -> Result<u64> {
        let result = self.inner.detach_subject_documents(subject_id).await;
        self.bump(&[Collection::Documents]);
        result
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaCacheWrapper;
    use crate::storage::memory_storage::MemoryStorage;
    use std::time::Duration;

    fn wrap(inner: Arc<MemoryStorage>) -> CachedStorage {
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::new(100, Duration::from_secs(60)));
        CachedStorage::new(inner, cache)
    }

    fn subject(name: &str) -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: name.to_string(),
            class_name: "7A".to_string(),
            max_score: None,
        }
    }

    #[tokio::test]
    async fn test_write_through_wrapper_invalidates_list() {
        let storage = wrap(Arc::new(MemoryStorage::new()));
        assert!(storage.list_subjects().await.unwrap().is_empty());

        storage.create_subject(subject("Math")).await.unwrap();
        let subjects = storage.list_subjects().await.unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "Math");
    }

    #[tokio::test]
    async fn test_external_write_served_from_cache_until_expiry() {
        let inner = Arc::new(MemoryStorage::new());
        let storage = wrap(inner.clone());
        assert!(storage.list_subjects().await.unwrap().is_empty());

        // 绕过包装器的写入在 TTL 内不可见
        inner.create_subject(subject("Physics")).await.unwrap();
        assert!(storage.list_subjects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subject_delete_invalidates_documents() {
        let storage = wrap(Arc::new(MemoryStorage::new()));
        let created = storage.create_subject(subject("Math")).await.unwrap();
        storage
            .create_document(CreateDocumentRequest {
                subject_id: Some(created.id),
                title: "Notes".to_string(),
                description: None,
                file_url: "https://files.example/notes.pdf".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(storage.list_documents(Some(created.id)).await.unwrap().len(), 1);

        storage.delete_subject(created.id).await.unwrap();
        assert!(storage.list_documents(Some(created.id)).await.unwrap().is_empty());
    }
}
