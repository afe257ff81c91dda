pub mod assignments;
pub mod documents;
pub mod recompute;
pub mod scoring;
pub mod students;
pub mod subjects;
pub mod submissions;
pub mod system;

pub use assignments::AssignmentService;
pub use documents::DocumentService;
pub use recompute::RecomputeService;
pub use scoring::ScoringService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use system::SystemService;
