//! 内存存储实现
//!
//! 进程内的记录存储，用于测试以及 `database.url = "memory://"` 的演示模式。
//! 行为与关系型存储保持一致：排序规则、级联删除、唯一约束。

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::{Result, ScorebookError};
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentFilter, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    documents::{entities::Document, requests::CreateDocumentRequest},
    students::{entities::Student, requests::CreateStudentRequest},
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, DEFAULT_MAX_SCORE, UpdateSubjectRequest},
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, ResubmitSubmission, SubmissionFilter},
    },
};
use crate::storage::Storage;

#[derive(Default)]
struct Tables {
    next_id: i64,
    subjects: BTreeMap<i64, Subject>,
    students: BTreeMap<i64, Student>,
    assignments: BTreeMap<i64, Assignment>,
    submissions: BTreeMap<i64, Submission>,
    documents: BTreeMap<i64, Document>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
    #[cfg(test)]
    failing_submissions: std::sync::Mutex<std::collections::HashSet<i64>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 让指定提交的分数写入失败（测试尽力而为的批处理）
    #[cfg(test)]
    pub(crate) fn fail_submission_writes(&self, submission_id: i64) {
        if let Ok(mut failing) = self.failing_submissions.lock() {
            failing.insert(submission_id);
        }
    }

    #[cfg(test)]
    fn check_submission_write(&self, submission_id: i64) -> Result<()> {
        let failing = self
            .failing_submissions
            .lock()
            .map(|f| f.contains(&submission_id))
            .unwrap_or(false);
        if failing {
            return Err(ScorebookError::store_unavailable(format!(
                "写入提交 {submission_id} 失败"
            )));
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn check_submission_write(&self, _submission_id: i64) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    // 科目模块
    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let tables = self.tables.read().await;
        let mut subjects: Vec<Subject> = tables.subjects.values().cloned().collect();
        subjects.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(subjects)
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        Ok(self.tables.read().await.subjects.get(&id).cloned())
    }

    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let subject = Subject {
            id: tables.allocate_id(),
            name: req.name,
            class_name: req.class_name,
            max_score: req.max_score.unwrap_or(DEFAULT_MAX_SCORE),
            total_assignments: 0,
            score_per_assignment: 0.0,
            created_at: now,
            updated_at: now,
        };
        tables.subjects.insert(subject.id, subject.clone());
        Ok(subject)
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let mut tables = self.tables.write().await;
        let Some(subject) = tables.subjects.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            subject.name = name;
        }
        if let Some(class_name) = update.class_name {
            subject.class_name = class_name;
        }
        if let Some(max_score) = update.max_score {
            subject.max_score = max_score;
        }
        subject.updated_at = Utc::now();
        Ok(Some(subject.clone()))
    }

    async fn set_subject_distribution(
        &self,
        id: i64,
        total_assignments: i32,
        score_per_assignment: f64,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.subjects.get_mut(&id) {
            Some(subject) => {
                subject.total_assignments = total_assignments;
                subject.score_per_assignment = score_per_assignment;
                subject.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.subjects.remove(&id).is_none() {
            return Ok(false);
        }

        // 与外键约束一致：作业及其提交级联删除，资料解除关联
        let assignment_ids: Vec<i64> = tables
            .assignments
            .values()
            .filter(|a| a.subject_id == id)
            .map(|a| a.id)
            .collect();
        tables.assignments.retain(|_, a| a.subject_id != id);
        tables
            .submissions
            .retain(|_, s| !assignment_ids.contains(&s.assignment_id));
        for document in tables.documents.values_mut() {
            if document.subject_id == Some(id) {
                document.subject_id = None;
            }
        }
        Ok(true)
    }

    // 学生模块
    async fn list_students(&self) -> Result<Vec<Student>> {
        let tables = self.tables.read().await;
        let mut students: Vec<Student> = tables.students.values().cloned().collect();
        students.sort_by(|a, b| a.student_code.cmp(&b.student_code));
        Ok(students)
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>> {
        Ok(self
            .tables
            .read()
            .await
            .students
            .values()
            .find(|s| s.student_code == student_code)
            .cloned())
    }

    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        let mut tables = self.tables.write().await;
        if tables
            .students
            .values()
            .any(|s| s.student_code == req.student_code)
        {
            return Err(ScorebookError::conflict(format!(
                "学号已存在: {}",
                req.student_code
            )));
        }

        let now = Utc::now();
        let student = Student {
            id: tables.allocate_id(),
            student_code: req.student_code,
            name: req.name,
            class_name: req.class_name,
            total_score: 0.0,
            created_at: now,
            updated_at: now,
        };
        tables.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn set_student_total_score(&self, id: i64, total_score: f64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.students.get_mut(&id) {
            Some(student) => {
                student.total_score = total_score;
                student.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // 作业模块
    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
        let tables = self.tables.read().await;
        let mut assignments: Vec<Assignment> = tables
            .assignments
            .values()
            .filter(|a| filter.subject_id.is_none_or(|id| a.subject_id == id))
            .filter(|a| !filter.active_only || a.is_active)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(assignments)
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        Ok(self.tables.read().await.assignments.get(&id).cloned())
    }

    async fn create_assignment(
        &self,
        req: CreateAssignmentRequest,
        score: f64,
    ) -> Result<Assignment> {
        let mut tables = self.tables.write().await;
        if !tables.subjects.contains_key(&req.subject_id) {
            return Err(ScorebookError::database_operation(format!(
                "外键约束失败: 科目 {} 不存在",
                req.subject_id
            )));
        }

        let now = Utc::now();
        let assignment = Assignment {
            id: tables.allocate_id(),
            subject_id: req.subject_id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            score,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let mut tables = self.tables.write().await;
        if let Some(subject_id) = update.subject_id
            && !tables.subjects.contains_key(&subject_id)
        {
            return Err(ScorebookError::database_operation(format!(
                "外键约束失败: 科目 {subject_id} 不存在"
            )));
        }

        let Some(assignment) = tables.assignments.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(subject_id) = update.subject_id {
            assignment.subject_id = subject_id;
        }
        if let Some(title) = update.title {
            assignment.title = title;
        }
        if let Some(description) = update.description {
            assignment.description = Some(description);
        }
        if let Some(due_date) = update.due_date {
            assignment.due_date = Some(due_date);
        }
        assignment.updated_at = Utc::now();
        Ok(Some(assignment.clone()))
    }

    async fn set_assignment_score(&self, id: i64, score: f64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.assignments.get_mut(&id) {
            Some(assignment) => {
                assignment.score = score;
                assignment.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate_assignment(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.assignments.get_mut(&id) {
            Some(assignment) if assignment.is_active => {
                assignment.is_active = false;
                assignment.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn deactivate_subject_assignments(&self, subject_id: i64) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut affected = 0;
        for assignment in tables.assignments.values_mut() {
            if assignment.subject_id == subject_id && assignment.is_active {
                assignment.is_active = false;
                assignment.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    // 提交模块
    async fn list_submissions(&self, filter: SubmissionFilter) -> Result<Vec<Submission>> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .values()
            .filter(|s| filter.student_id.is_none_or(|id| s.student_id == id))
            .filter(|s| filter.assignment_id.is_none_or(|id| s.assignment_id == id))
            .filter(|s| filter.subject_id.is_none_or(|id| s.subject_id == id))
            .cloned()
            .collect())
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        Ok(self.tables.read().await.submissions.get(&id).cloned())
    }

    async fn get_submission_by_student_and_assignment(
        &self,
        student_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        Ok(self
            .tables
            .read()
            .await
            .submissions
            .values()
            .find(|s| s.student_id == student_id && s.assignment_id == assignment_id)
            .cloned())
    }

    async fn create_submission(&self, req: NewSubmission) -> Result<Submission> {
        let mut tables = self.tables.write().await;
        if tables
            .submissions
            .values()
            .any(|s| s.student_id == req.student_id && s.assignment_id == req.assignment_id)
        {
            return Err(ScorebookError::conflict(format!(
                "学生 {} 已提交作业 {}",
                req.student_id, req.assignment_id
            )));
        }

        let now = Utc::now();
        let submission = Submission {
            id: tables.allocate_id(),
            student_id: req.student_id,
            assignment_id: req.assignment_id,
            subject_id: req.subject_id,
            file_name: req.file_name,
            file_url: req.file_url,
            score: req.score,
            status: SubmissionStatus::Submitted,
            submitted_at: now,
            updated_at: now,
        };
        tables.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn resubmit_submission(
        &self,
        id: i64,
        update: ResubmitSubmission,
    ) -> Result<Option<Submission>> {
        let mut tables = self.tables.write().await;
        let Some(submission) = tables.submissions.get_mut(&id) else {
            return Ok(None);
        };

        submission.file_name = update.file_name;
        submission.file_url = update.file_url;
        submission.score = update.score;
        submission.status = SubmissionStatus::Resubmitted;
        submission.updated_at = Utc::now();
        Ok(Some(submission.clone()))
    }

    async fn set_submission_score(&self, id: i64, score: f64) -> Result<bool> {
        self.check_submission_write(id)?;

        let mut tables = self.tables.write().await;
        match tables.submissions.get_mut(&id) {
            Some(submission) => {
                submission.score = score;
                submission.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn move_assignment_submissions(
        &self,
        assignment_id: i64,
        subject_id: i64,
    ) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut affected = 0;
        for submission in tables.submissions.values_mut() {
            if submission.assignment_id == assignment_id {
                submission.subject_id = subject_id;
                submission.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    // 教学资料模块
    async fn list_documents(&self, subject_id: Option<i64>) -> Result<Vec<Document>> {
        let tables = self.tables.read().await;
        let mut documents: Vec<Document> = tables
            .documents
            .values()
            .filter(|d| subject_id.is_none_or(|id| d.subject_id == Some(id)))
            .cloned()
            .collect();
        documents.sort_by(|a, b| (b.uploaded_at, b.id).cmp(&(a.uploaded_at, a.id)));
        Ok(documents)
    }

    async fn create_document(&self, req: CreateDocumentRequest) -> Result<Document> {
        let mut tables = self.tables.write().await;
        let document = Document {
            id: tables.allocate_id(),
            subject_id: req.subject_id,
            title: req.title,
            description: req.description,
            file_url: req.file_url,
            uploaded_at: Utc::now(),
        };
        tables.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn delete_document(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.documents.remove(&id).is_some())
    }

    async fn detach_subject_documents(&self, subject_id: i64) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let mut affected = 0;
        for document in tables.documents.values_mut() {
            if document.subject_id == Some(subject_id) {
                document.subject_id = None;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
