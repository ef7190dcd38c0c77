pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod files;
pub mod grades;
pub mod submissions;
pub mod users;

pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};

/// 业务错误码，按 HTTP 状态码分段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,

    // 400 输入错误
    BadRequest = 40000,
    InvalidScore = 40001,
    DeadlinePassed = 40002,
    EmptySubmission = 40003,
    FileTypeNotAllowed = 40004,
    UserNameInvalid = 40005,
    UserEmailInvalid = 40006,
    UserPasswordInvalid = 40007,
    DateParseFailed = 40008,
    FileSizeExceeded = 40009,

    // 401 认证错误
    Unauthorized = 40100,
    TokenExpired = 40101,
    AuthFailed = 40102,

    // 403 权限错误
    Forbidden = 40300,
    NotApproved = 40301,

    // 404 资源不存在
    NotFound = 40400,
    UserNotFound = 40401,
    CourseNotFound = 40402,
    AssignmentNotFound = 40403,
    SubmissionNotFound = 40404,
    GradeNotFound = 40405,
    FileNotFound = 40406,

    // 409 冲突
    Conflict = 40900,
    UserEmailAlreadyExists = 40901,
    AlreadyEnrolled = 40902,
    AssignmentLocked = 40903,

    // 500 服务器错误
    InternalServerError = 50000,
    FileUploadFailed = 50001,
    RegisterFailed = 50002,
}

/// 应用启动时间（用于启动耗时统计）
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_segments() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::TokenExpired as i32, 40101);
        assert_eq!(ErrorCode::AssignmentLocked as i32, 40903);
        assert_eq!(ErrorCode::InternalServerError as i32, 50000);
    }
}
