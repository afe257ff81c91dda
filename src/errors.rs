//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_scorebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum ScorebookError {
            $($variant(String),)*
        }

        impl ScorebookError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ScorebookError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ScorebookError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ScorebookError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ScorebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ScorebookError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_scorebook_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    StoreUnavailable("E004", "Record Store Unavailable"),
    FileOperation("E005", "File Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Conflict("E008", "Resource Conflict"),
    Serialization("E009", "Serialization Error"),
}

impl ScorebookError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 存储层暂时不可用（可重试）
    pub fn is_transient(&self) -> bool {
        matches!(self, ScorebookError::StoreUnavailable(_))
    }
}

impl fmt::Display for ScorebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ScorebookError {}

/// 连接类错误视为存储不可用，唯一约束冲突视为资源冲突，其余归为数据库操作错误
pub fn classify_db_error(context: &str, err: sea_orm::DbErr) -> ScorebookError {
    if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return ScorebookError::Conflict(format!("{context}: {detail}"));
    }
    match err {
        sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
            ScorebookError::StoreUnavailable(format!("{context}: {err}"))
        }
        _ => ScorebookError::DatabaseOperation(format!("{context}: {err}")),
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ScorebookError {
    fn from(err: sea_orm::DbErr) -> Self {
        classify_db_error("database error", err)
    }
}

impl From<std::io::Error> for ScorebookError {
    fn from(err: std::io::Error) -> Self {
        ScorebookError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ScorebookError {
    fn from(err: serde_json::Error) -> Self {
        ScorebookError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScorebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ScorebookError::database_config("test").code(), "E001");
        assert_eq!(ScorebookError::store_unavailable("test").code(), "E004");
        assert_eq!(ScorebookError::validation("test").code(), "E006");
        assert_eq!(ScorebookError::not_found("test").code(), "E007");
        assert_eq!(ScorebookError::conflict("test").code(), "E008");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ScorebookError::store_unavailable("test").error_type(),
            "Record Store Unavailable"
        );
        assert_eq!(
            ScorebookError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = ScorebookError::not_found("Subject 7 not found");
        assert_eq!(err.message(), "Subject 7 not found");
    }

    #[test]
    fn test_format_simple() {
        let err = ScorebookError::validation("max_score must be positive");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("max_score must be positive"));
    }

    #[test]
    fn test_db_error_classification() {
        let err = classify_db_error(
            "load subject",
            sea_orm::DbErr::Custom("constraint violated".to_string()),
        );
        assert_eq!(err.code(), "E003");
        assert!(!err.is_transient());
        assert!(err.message().starts_with("load subject"));
    }
}
