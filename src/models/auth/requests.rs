use serde::Deserialize;

use crate::models::users::UserRole;

// 用户注册请求（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// 校内邮箱
    pub email: String,
    /// 密码
    pub password: String,
    /// 姓名
    pub full_name: String,
    /// 申请角色（student / professor）
    pub role: UserRole,
}

// 用户登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// 刷新令牌请求
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}
