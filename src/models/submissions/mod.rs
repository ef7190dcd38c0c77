pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Submission, SubmissionStatus};
