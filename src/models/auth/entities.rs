use serde::{Deserialize, Serialize};

use crate::models::users::UserRole;

// 已认证用户身份（由JWT声明还原，不查数据库）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}
