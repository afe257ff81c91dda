//! 引擎错误到 HTTP 响应的映射

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::ScorebookError;
use crate::models::{ApiResponse, ErrorCode};

/// 将错误转换为统一格式的响应
///
/// `not_found` 为资源不存在时使用的业务错误码。
pub fn error_response(err: &ScorebookError, not_found: ErrorCode, action: &str) -> HttpResponse {
    let message = format!("{action}: {}", err.message());
    match err {
        ScorebookError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(not_found, message))
        }
        ScorebookError::Validation(_) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, message)),
        ScorebookError::Conflict(_) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, message))
        }
        ScorebookError::StoreUnavailable(_) => {
            error!("{}", err.format_simple());
            HttpResponse::ServiceUnavailable()
                .json(ApiResponse::error_empty(ErrorCode::StoreUnavailable, message))
        }
        _ => {
            error!("{}", err.format_simple());
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                message,
            ))
        }
    }
}
