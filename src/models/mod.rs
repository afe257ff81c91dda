//! 数据模型定义
//!
//! - `entities`: 业务实体
//! - `requests`: 请求参数
//! - `responses`: 响应结构

pub mod common {
    pub mod error_code;
    pub mod pagination;
    pub mod response;
}

pub mod assignments {
    pub mod entities;
    pub mod requests;
}

pub mod documents {
    pub mod entities;
    pub mod requests;
}

pub mod scoring {
    pub mod entities;
    pub mod responses;
}

pub mod students {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod subjects {
    pub mod entities;
    pub mod requests;
}

pub mod submissions {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
