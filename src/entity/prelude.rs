pub use super::assignments::Entity as Assignments;
pub use super::attachments::Entity as Attachments;
pub use super::courses::Entity as Courses;
pub use super::enrollments::Entity as Enrollments;
pub use super::grades::Entity as Grades;
pub use super::submission_files::Entity as SubmissionFiles;
pub use super::submissions::Entity as Submissions;
pub use super::users::Entity as Users;
