pub mod create;
pub mod get;
pub mod list;
pub mod totals;
pub mod views;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, StudentTotalParams,
};
use crate::services::scoring::ScoringService;
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_scoring(&self, request: &HttpRequest) -> Arc<ScoringService> {
        ScoringService::from_request(request)
    }

    // 获取学生列表（分页，可按班级过滤）
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        student_data: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, student_data).await
    }

    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, request, student_id).await
    }

    // 重算学生总分，指定科目时只返回小计
    pub async fn recalculate_total(
        &self,
        request: &HttpRequest,
        student_id: i64,
        params: StudentTotalParams,
    ) -> ActixResult<HttpResponse> {
        totals::recalculate_total(self, request, student_id, params).await
    }

    // 学生各科得分
    pub async fn get_scores(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        totals::get_scores(self, request, student_id).await
    }

    // 学生作业清单（含未提交作业）
    pub async fn get_assignments(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        views::get_assignments(self, request, student_id).await
    }

    // 学生所在班级的成绩表
    pub async fn get_scoreboard(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        views::get_scoreboard(self, request, student_id).await
    }

    // 重算全部学生总分
    pub async fn recalculate_all(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        totals::recalculate_all(self, request).await
    }
}
