//! HTTP 接口测试（内存存储）

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use rust_scorebook::config::ScoringConfig;
use rust_scorebook::models::AppStartTime;
use rust_scorebook::routes;
use rust_scorebook::services::ScoringService;
use rust_scorebook::storage::Storage;
use rust_scorebook::storage::memory_storage::MemoryStorage;
use rust_scorebook::utils::{json_error_handler, query_error_handler};

fn app_state(background: bool) -> (Arc<dyn Storage>, Arc<ScoringService>) {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let scoring = Arc::new(ScoringService::new(
        storage.clone(),
        &ScoringConfig {
            background_recompute: background,
            max_tracked_jobs: 20,
        },
    ));
    (storage, scoring)
}

macro_rules! init_app {
    ($storage:expr, $scoring:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new($scoring.clone()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(routes::configure_api_routes),
        )
        .await
    };
}

macro_rules! call {
    ($app:expr, $req:expr, $status:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        assert_eq!(resp.status(), $status);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

fn scores(body: &Value) -> Vec<f64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["score"].as_f64().unwrap())
        .collect()
}

#[actix_web::test]
async fn test_assignment_lifecycle_redistributes_and_rescales() {
    let (storage, scoring) = app_state(false);
    let app = init_app!(storage, scoring);

    let body = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .set_json(json!({"name": "Math", "class_name": "7A", "max_score": 100})),
        StatusCode::CREATED
    );
    let subject_id = body["data"]["id"].as_i64().unwrap();

    let mut assignment_ids = Vec::new();
    for title in ["HW1", "HW2", "HW3"] {
        let body = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/assignments")
                .set_json(json!({"subject_id": subject_id, "title": title})),
            StatusCode::CREATED
        );
        assert_eq!(body["data"]["recompute"]["mode"], "inline");
        assignment_ids.push(body["data"]["item"]["id"].as_i64().unwrap());
    }

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/assignments?subject_id={subject_id}")),
        StatusCode::OK
    );
    assert_eq!(scores(&body), vec![33.0, 33.0, 34.0]);

    let body = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/students")
            .set_json(json!({"student_code": "S001", "name": "Ada", "class_name": "7A"})),
        StatusCode::CREATED
    );
    let student_id = body["data"]["id"].as_i64().unwrap();

    // 不带分数的提交按作业分值给满分
    let body = call!(
        app,
        test::TestRequest::post().uri("/api/v1/submissions").set_json(json!({
            "student_id": student_id,
            "assignment_id": assignment_ids[0],
            "subject_id": subject_id,
            "file_name": "hw1.pdf",
            "file_url": "https://files.example/hw1.pdf"
        })),
        StatusCode::CREATED
    );
    assert_eq!(body["data"]["submission"]["score"], 33.0);
    assert_eq!(body["data"]["student_total"], 33.0);

    // 删除第三份作业：33/33/34 -> 50/50，满分提交随之变为 50
    let body = call!(
        app,
        test::TestRequest::delete().uri(&format!("/api/v1/assignments/{}", assignment_ids[2])),
        StatusCode::OK
    );
    assert_eq!(body["data"]["mode"], "inline");

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/assignments?subject_id={subject_id}")),
        StatusCode::OK
    );
    assert_eq!(scores(&body), vec![50.0, 50.0]);

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/students/{student_id}")),
        StatusCode::OK
    );
    assert_eq!(body["data"]["total_score"], 50.0);

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/students/{student_id}/scores")),
        StatusCode::OK
    );
    assert_eq!(body["data"]["subjects"][0]["earned"], 50.0);

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/students/{student_id}/assignments")),
        StatusCode::OK
    );
    assert_eq!(body["data"]["pending_count"], 1);
    assert_eq!(body["data"]["assignments"][0]["is_submitted"], true);
    assert_eq!(body["data"]["assignments"][1]["is_submitted"], false);
    assert_eq!(body["data"]["assignments"][1]["score"], 0.0);

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/students/{student_id}/scoreboard")),
        StatusCode::OK
    );
    let board = &body["data"][0];
    assert_eq!(board["assignments"].as_array().unwrap().len(), 2);
    assert_eq!(board["students"][0]["total_score"], 50.0);
    assert_eq!(board["students"][0]["max_total_score"], 100.0);
    assert_eq!(board["students"][0]["percentage"], 50.0);

    call!(
        app,
        test::TestRequest::get().uri("/api/v1/students/9999/scoreboard"),
        StatusCode::NOT_FOUND
    );

    // 已删除的作业不能再提交
    call!(
        app,
        test::TestRequest::post().uri("/api/v1/submissions").set_json(json!({
            "student_id": student_id,
            "assignment_id": assignment_ids[2],
            "subject_id": subject_id,
            "file_name": "hw3.pdf",
            "file_url": "https://files.example/hw3.pdf"
        })),
        StatusCode::BAD_REQUEST
    );

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!(
            "/api/v1/submissions?student_id={student_id}&page=1&size=5"
        )),
        StatusCode::OK
    );
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["score"], 50.0);
}

#[actix_web::test]
async fn test_moving_assignment_recomputes_both_subjects() {
    let (storage, scoring) = app_state(false);
    let app = init_app!(storage, scoring);

    let mut subject_ids = Vec::new();
    for name in ["Math", "Physics"] {
        let body = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/subjects")
                .set_json(json!({"name": name, "class_name": "7A"})),
            StatusCode::CREATED
        );
        subject_ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let mut math_assignments = Vec::new();
    for title in ["HW1", "HW2"] {
        let body = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/assignments")
                .set_json(json!({"subject_id": subject_ids[0], "title": title})),
            StatusCode::CREATED
        );
        math_assignments.push(body["data"]["item"]["id"].as_i64().unwrap());
    }

    let body = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/assignments/{}", math_assignments[1]))
            .set_json(json!({"subject_id": subject_ids[1]})),
        StatusCode::OK
    );
    assert_eq!(body["data"]["item"]["subject_id"], subject_ids[1]);
    assert_eq!(body["data"]["item"]["score"], 100.0);
    assert_eq!(
        body["data"]["recompute"]["reports"].as_array().unwrap().len(),
        2
    );

    for subject_id in &subject_ids {
        let body = call!(
            app,
            test::TestRequest::get().uri(&format!("/api/v1/assignments?subject_id={subject_id}")),
            StatusCode::OK
        );
        assert_eq!(scores(&body), vec![100.0]);
    }
}

#[actix_web::test]
async fn test_subject_update_with_new_max_score_rescales() {
    let (storage, scoring) = app_state(false);
    let app = init_app!(storage, scoring);

    let body = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .set_json(json!({"name": "Math", "class_name": "7A", "max_score": 50})),
        StatusCode::CREATED
    );
    let subject_id = body["data"]["id"].as_i64().unwrap();
    let body = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/assignments")
            .set_json(json!({"subject_id": subject_id, "title": "HW1"})),
        StatusCode::CREATED
    );
    let assignment_id = body["data"]["item"]["id"].as_i64().unwrap();
    let body = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/students")
            .set_json(json!({"student_code": "S002", "name": "Bo", "class_name": "7A"})),
        StatusCode::CREATED
    );
    let student_id = body["data"]["id"].as_i64().unwrap();
    call!(
        app,
        test::TestRequest::post().uri("/api/v1/submissions").set_json(json!({
            "student_id": student_id,
            "assignment_id": assignment_id,
            "subject_id": subject_id,
            "file_name": "hw1.pdf",
            "file_url": "https://files.example/hw1.pdf",
            "score": 25
        })),
        StatusCode::CREATED
    );

    // 50 -> 40：25 分按比例变为 20
    let body = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/subjects/{subject_id}"))
            .set_json(json!({"max_score": 40})),
        StatusCode::OK
    );
    assert_eq!(body["data"]["item"]["max_score"], 40.0);

    let body = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/students/{student_id}")),
        StatusCode::OK
    );
    assert_eq!(body["data"]["total_score"], 20.0);

    // 指定科目的小计不落库
    let body = call!(
        app,
        test::TestRequest::post().uri(&format!(
            "/api/v1/students/{student_id}/total?subject_id={subject_id}"
        )),
        StatusCode::OK
    );
    assert_eq!(body["data"]["new_total"], 20.0);
    assert_eq!(body["data"]["persisted"], false);
}

#[actix_web::test]
async fn test_background_recompute_job_is_tracked() {
    let (storage, scoring) = app_state(true);
    let app = init_app!(storage, scoring);

    let body = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .set_json(json!({"name": "Math", "class_name": "7A"})),
        StatusCode::CREATED
    );
    let subject_id = body["data"]["id"].as_i64().unwrap();

    let body = call!(
        app,
        test::TestRequest::post().uri(&format!("/api/v1/subjects/{subject_id}/recompute")),
        StatusCode::OK
    );
    assert_eq!(body["data"]["mode"], "background");
    let job_id = body["data"]["job_ids"][0].as_str().unwrap().to_string();

    let mut status = String::new();
    for _ in 0..50 {
        let body = call!(
            app,
            test::TestRequest::get().uri(&format!("/api/v1/recompute/jobs/{job_id}")),
            StatusCode::OK
        );
        status = body["data"]["status"].as_str().unwrap().to_string();
        if status == "succeeded" || status == "failed" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status, "succeeded");

    let body = call!(
        app,
        test::TestRequest::get().uri("/api/v1/recompute/jobs"),
        StatusCode::OK
    );
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_rejects_bad_input() {
    let (storage, scoring) = app_state(false);
    let app = init_app!(storage, scoring);

    let body = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .set_json(json!({"name": "Math", "class_name": "7A", "max_score": 99.5})),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(body["code"], 2001);

    call!(
        app,
        test::TestRequest::get().uri("/api/v1/subjects/not-a-number"),
        StatusCode::BAD_REQUEST
    );
    call!(
        app,
        test::TestRequest::get().uri("/api/v1/subjects/999"),
        StatusCode::NOT_FOUND
    );
    call!(
        app,
        test::TestRequest::post().uri("/api/v1/subjects/999/recompute"),
        StatusCode::NOT_FOUND
    );
    call!(
        app,
        test::TestRequest::get().uri("/api/v1/recompute/jobs/not-a-uuid"),
        StatusCode::BAD_REQUEST
    );

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/students")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/students")
            .set_json(json!({"student_code": "S 1", "name": "Ada", "class_name": "7A"})),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_duplicate_student_code_conflicts() {
    let (storage, scoring) = app_state(false);
    let app = init_app!(storage, scoring);

    let student = json!({"student_code": "S010", "name": "Ada", "class_name": "7A"});
    call!(
        app,
        test::TestRequest::post().uri("/api/v1/students").set_json(&student),
        StatusCode::CREATED
    );
    let body = call!(
        app,
        test::TestRequest::post().uri("/api/v1/students").set_json(&student),
        StatusCode::CONFLICT
    );
    assert_eq!(body["code"], 3001);
}

#[actix_web::test]
async fn test_health() {
    let (storage, scoring) = app_state(false);
    let app = init_app!(storage, scoring);

    let body = call!(
        app,
        test::TestRequest::get().uri("/api/v1/system/health"),
        StatusCode::OK
    );
    assert_eq!(body["data"]["store"], "ok");
}
