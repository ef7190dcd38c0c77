use super::entities::User;
use serde::Serialize;

// 用户响应
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

// 用户列表响应
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
}

/// 学生名册条目（教授/管理员选人录入用）
#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub items: Vec<StudentSummary>,
}
