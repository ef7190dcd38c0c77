pub mod admin;
pub mod assignments;
pub mod auth;
pub mod courses;
pub mod grades;
pub(crate) mod multipart;
pub mod submissions;

pub use admin::AdminService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use grades::GradeService;
pub use submissions::SubmissionService;
