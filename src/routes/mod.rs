pub mod assignments;

pub mod documents;

pub mod recompute;

pub mod students;

pub mod subjects;

pub mod submissions;

pub mod system;

use actix_web::web;

pub use assignments::configure_assignments_routes;
pub use documents::configure_documents_routes;
pub use recompute::configure_recompute_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use submissions::configure_submissions_routes;
pub use system::configure_system_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_subjects_routes)
        .configure(configure_students_routes)
        .configure(configure_assignments_routes)
        .configure(configure_submissions_routes)
        .configure(configure_documents_routes)
        .configure(configure_recompute_routes)
        .configure(configure_system_routes);
}
