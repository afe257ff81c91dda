//! SeaORM 存储 + 计分引擎集成测试（内存 SQLite）

use std::sync::Arc;

use rust_scorebook::config::{DatabaseConfig, ScoringConfig};
use rust_scorebook::errors::ScorebookError;
use rust_scorebook::models::assignments::requests::{AssignmentFilter, CreateAssignmentRequest};
use rust_scorebook::models::documents::requests::CreateDocumentRequest;
use rust_scorebook::models::students::requests::CreateStudentRequest;
use rust_scorebook::models::subjects::requests::CreateSubjectRequest;
use rust_scorebook::models::submissions::requests::{SubmissionFilter, SubmitAssignmentRequest};
use rust_scorebook::services::ScoringService;
use rust_scorebook::storage::Storage;
use rust_scorebook::storage::sea_orm_storage::SeaOrmStorage;

async fn setup() -> (Arc<dyn Storage>, Arc<ScoringService>) {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
        max_retries: 2,
        retry_base_delay_ms: 10,
    };
    let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::connect(&config).await.unwrap());
    let scoring = Arc::new(ScoringService::new(
        storage.clone(),
        &ScoringConfig {
            background_recompute: false,
            max_tracked_jobs: 10,
        },
    ));
    (storage, scoring)
}

async fn create_subject(storage: &Arc<dyn Storage>, max_score: f64) -> i64 {
    storage
        .create_subject(CreateSubjectRequest {
            name: "Math".to_string(),
            class_name: "7A".to_string(),
            max_score: Some(max_score),
        })
        .await
        .unwrap()
        .id
}

async fn create_assignment(storage: &Arc<dyn Storage>, subject_id: i64, title: &str) -> i64 {
    storage
        .create_assignment(
            CreateAssignmentRequest {
                subject_id,
                title: title.to_string(),
                description: None,
                due_date: None,
                score: None,
            },
            100.0,
        )
        .await
        .unwrap()
        .id
}

async fn create_student(storage: &Arc<dyn Storage>, code: &str) -> i64 {
    storage
        .create_student(CreateStudentRequest {
            student_code: code.to_string(),
            name: format!("Student {code}"),
            class_name: "7A".to_string(),
        })
        .await
        .unwrap()
        .id
}

fn submit_req(student_id: i64, assignment_id: i64, subject_id: i64) -> SubmitAssignmentRequest {
    SubmitAssignmentRequest {
        student_id,
        assignment_id,
        subject_id,
        file_name: "answer.pdf".to_string(),
        file_url: "https://files.example/answer.pdf".to_string(),
        score: None,
    }
}

async fn active_scores(storage: &Arc<dyn Storage>, subject_id: i64) -> Vec<f64> {
    storage
        .list_assignments(AssignmentFilter::active_in_subject(subject_id))
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.score)
        .collect()
}

#[tokio::test]
async fn test_redistribution_and_rescale_through_sqlite() {
    let (storage, scoring) = setup().await;
    let subject_id = create_subject(&storage, 100.0).await;
    let a1 = create_assignment(&storage, subject_id, "HW1").await;
    let a2 = create_assignment(&storage, subject_id, "HW2").await;

    scoring.recompute_subject(subject_id).await.unwrap();
    assert_eq!(active_scores(&storage, subject_id).await, vec![50.0, 50.0]);

    let student_id = create_student(&storage, "S001").await;
    let receipt = scoring
        .record_submission(submit_req(student_id, a1, subject_id))
        .await
        .unwrap();
    assert!(receipt.created);
    assert_eq!(receipt.submission.score, 50.0);
    assert_eq!(receipt.student_total, 50.0);

    // 第三份作业加入后重新分配为 33/33/34
    let _a3 = create_assignment(&storage, subject_id, "HW3").await;
    let report = scoring.recompute_subject(subject_id).await.unwrap();
    assert_eq!(report.redistribution.total_assignments, 3);
    assert_eq!(active_scores(&storage, subject_id).await, vec![33.0, 33.0, 34.0]);
    assert_eq!(report.rescale.updated_count, 1);

    let subject = storage.get_subject_by_id(subject_id).await.unwrap().unwrap();
    assert_eq!(subject.score_per_assignment, 33.0);

    let student = storage.get_student_by_id(student_id).await.unwrap().unwrap();
    assert_eq!(student.total_score, 33.0);

    // 再次执行不产生变化
    let again = scoring.recompute_subject(subject_id).await.unwrap();
    assert!(again.redistribution.changed_assignments.is_empty());
    assert_eq!(again.rescale.updated_count, 0);

    // 软删除后剩余作业重新分配
    assert!(storage.deactivate_assignment(a2).await.unwrap());
    scoring.recompute_subject(subject_id).await.unwrap();
    assert_eq!(active_scores(&storage, subject_id).await, vec![50.0, 50.0]);
    let student = storage.get_student_by_id(student_id).await.unwrap().unwrap();
    assert_eq!(student.total_score, 50.0);
}

#[tokio::test]
async fn test_resubmission_updates_in_place() {
    let (storage, scoring) = setup().await;
    let subject_id = create_subject(&storage, 100.0).await;
    let a1 = create_assignment(&storage, subject_id, "HW1").await;
    scoring.recompute_subject(subject_id).await.unwrap();
    let student_id = create_student(&storage, "S002").await;

    let mut req = submit_req(student_id, a1, subject_id);
    req.score = Some(60.0);
    let first = scoring.record_submission(req.clone()).await.unwrap();

    req.score = Some(80.0);
    req.file_name = "answer-v2.pdf".to_string();
    let second = scoring.record_submission(req).await.unwrap();

    assert!(!second.created);
    assert_eq!(second.submission.id, first.submission.id);
    assert_eq!(second.score_change, 20.0);
    assert_eq!(second.student_total, 80.0);

    let submissions = storage
        .list_submissions(SubmissionFilter::by_student(student_id))
        .await
        .unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].file_name, "answer-v2.pdf");
}

#[tokio::test]
async fn test_duplicate_student_code_conflicts() {
    let (storage, _) = setup().await;
    create_student(&storage, "S003").await;

    let err = storage
        .create_student(CreateStudentRequest {
            student_code: "S003".to_string(),
            name: "Other".to_string(),
            class_name: "7B".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ScorebookError::Conflict(_)));
}

#[tokio::test]
async fn test_remove_subject_cascades() {
    let (storage, scoring) = setup().await;
    let subject_id = create_subject(&storage, 100.0).await;
    let a1 = create_assignment(&storage, subject_id, "HW1").await;
    scoring.recompute_subject(subject_id).await.unwrap();
    let student_id = create_student(&storage, "S004").await;
    scoring
        .record_submission(submit_req(student_id, a1, subject_id))
        .await
        .unwrap();
    let document = storage
        .create_document(CreateDocumentRequest {
            subject_id: Some(subject_id),
            title: "Syllabus".to_string(),
            description: None,
            file_url: "https://files.example/syllabus.pdf".to_string(),
        })
        .await
        .unwrap();

    let removal = scoring.remove_subject(subject_id).await.unwrap();
    assert_eq!(removal.deactivated_assignments, 1);
    assert_eq!(removal.detached_documents, 1);
    assert_eq!(removal.students_updated, 1);

    assert!(storage.get_subject_by_id(subject_id).await.unwrap().is_none());
    let student = storage.get_student_by_id(student_id).await.unwrap().unwrap();
    assert_eq!(student.total_score, 0.0);

    let documents = storage.list_documents(None).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, document.id);
    assert_eq!(documents[0].subject_id, None);
}

#[tokio::test]
async fn test_ping() {
    let (storage, _) = setup().await;
    storage.ping().await.unwrap();
}
