use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::RecomputeService;
use crate::utils::SafeJobId;

static RECOMPUTE_SERVICE: Lazy<RecomputeService> = Lazy::new(RecomputeService::new_lazy);

pub async fn list_jobs(req: HttpRequest) -> ActixResult<HttpResponse> {
    RECOMPUTE_SERVICE.list_jobs(&req).await
}

pub async fn get_job(req: HttpRequest, job_id: SafeJobId) -> ActixResult<HttpResponse> {
    RECOMPUTE_SERVICE.get_job(&req, job_id.0).await
}

pub fn configure_recompute_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/recompute")
            .service(web::resource("/jobs").route(web::get().to(list_jobs)))
            .service(web::resource("/jobs/{job_id}").route(web::get().to(get_job))),
    );
}
