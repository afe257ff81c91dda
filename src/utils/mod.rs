pub mod extractor;
pub mod parameter_error_handler;
pub mod response;
pub mod retry;
pub mod validate;

pub use extractor::{
    SafeAssignmentIdI64, SafeDocumentIdI64, SafeJobId, SafeStudentIdI64, SafeSubjectIdI64,
    SafeSubmissionIdI64,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use response::error_response;
