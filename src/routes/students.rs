use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, StudentTotalParams,
};
use crate::services::StudentService;
use crate::utils::SafeStudentIdI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(&req, student_data.into_inner())
        .await
}

pub async fn get_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, student_id.0).await
}

pub async fn recalculate_total(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<StudentTotalParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .recalculate_total(&req, student_id.0, query.into_inner())
        .await
}

pub async fn get_scores(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_scores(&req, student_id.0).await
}

pub async fn get_assignments(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_assignments(&req, student_id.0).await
}

pub async fn get_scoreboard(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_scoreboard(&req, student_id.0).await
}

pub async fn recalculate_all(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.recalculate_all(&req).await
}

pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .service(
                web::resource("")
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student)),
            )
            // 需在 /{student_id} 之前注册
            .service(web::resource("/totals/recalculate").route(web::post().to(recalculate_all)))
            .service(web::resource("/{student_id}").route(web::get().to(get_student)))
            .service(
                web::resource("/{student_id}/total").route(web::post().to(recalculate_total)),
            )
            .service(web::resource("/{student_id}/scores").route(web::get().to(get_scores)))
            .service(
                web::resource("/{student_id}/assignments").route(web::get().to(get_assignments)),
            )
            .service(
                web::resource("/{student_id}/scoreboard").route(web::get().to(get_scoreboard)),
            ),
    );
}
