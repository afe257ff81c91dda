//! 路径参数提取器
//!
//! 路径中的 ID 解析失败时直接返回统一格式的 400 响应，而不是 actix 默认的纯文本错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str, raw: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid path parameter {name}: {raw}"),
    ));
    InternalError::from_response(format!("invalid {name}"), response).into()
}

/// 定义 i64 路径参数提取器
macro_rules! define_safe_i64_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    let raw = req.match_info().get($param).unwrap_or_default();
                    ready(match raw.parse::<i64>() {
                        Ok(id) if id > 0 => Ok($name(id)),
                        _ => Err(bad_path_param($param, raw)),
                    })
                }
            }
        )*
    };
}

define_safe_i64_extractor! {
    SafeSubjectIdI64 => "subject_id",
    SafeStudentIdI64 => "student_id",
    SafeAssignmentIdI64 => "assignment_id",
    SafeSubmissionIdI64 => "submission_id",
    SafeDocumentIdI64 => "document_id",
}

/// 重算任务 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeJobId(pub Uuid);

impl FromRequest for SafeJobId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("job_id").unwrap_or_default();
        ready(
            Uuid::parse_str(raw)
                .map(SafeJobId)
                .map_err(|_| bad_path_param("job_id", raw)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id_is_extracted() {
        let req = TestRequest::default()
            .param("subject_id", "42")
            .to_http_request();
        let id = SafeSubjectIdI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeSubjectIdI64(42));
    }

    #[actix_web::test]
    async fn test_invalid_id_is_rejected() {
        for raw in ["abc", "0", "-3"] {
            let req = TestRequest::default()
                .param("subject_id", raw)
                .to_http_request();
            let err = SafeSubjectIdI64::extract(&req).await.unwrap_err();
            assert_eq!(
                err.as_response_error().status_code(),
                actix_web::http::StatusCode::BAD_REQUEST
            );
        }
    }

    #[actix_web::test]
    async fn test_job_id() {
        let job_id = Uuid::new_v4();
        let req = TestRequest::default()
            .param("job_id", job_id.to_string())
            .to_http_request();
        assert_eq!(SafeJobId::extract(&req).await.unwrap().0, job_id);
    }
}
