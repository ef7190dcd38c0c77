use serde::Deserialize;

/// 创建课程请求
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
}

/// 更新课程请求
#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
}

/// 选课请求（教授/管理员代为加入学生）
#[derive(Debug, Deserialize)]
pub struct EnrollStudentRequest {
    pub student_id: String,
}
