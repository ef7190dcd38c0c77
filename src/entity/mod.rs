pub mod assignments;
pub mod attachments;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod prelude;
pub mod submission_files;
pub mod submissions;
pub mod users;
