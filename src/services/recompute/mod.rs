//! 后台重算任务查询

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{ApiResponse, ErrorCode};
use crate::services::scoring::ScoringService;

pub struct RecomputeService;

impl RecomputeService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_scoring(&self, request: &HttpRequest) -> Arc<ScoringService> {
        ScoringService::from_request(request)
    }

    // 最近的任务，新的在前
    pub async fn list_jobs(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scoring = self.get_scoring(request);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            scoring.jobs().list(),
            "Recompute jobs retrieved successfully",
        )))
    }

    pub async fn get_job(&self, request: &HttpRequest, job_id: Uuid) -> ActixResult<HttpResponse> {
        let scoring = self.get_scoring(request);
        match scoring.jobs().get(&job_id) {
            Some(job) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                job,
                "Recompute job retrieved successfully",
            ))),
            None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RecomputeJobNotFound,
                "Recompute job not found",
            ))),
        }
    }
}
