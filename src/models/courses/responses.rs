use serde::Serialize;

use super::entities::Course;

/// 课程列表项（附带教授姓名与选课人数）
#[derive(Debug, Serialize)]
pub struct CourseListItem {
    #[serde(flatten)]
    pub course: Course,
    pub professor_name: String,
    pub student_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub course: Course,
}

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub items: Vec<CourseListItem>,
}

/// 课程学生信息
#[derive(Debug, Serialize)]
pub struct CourseStudent {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct CourseStudentListResponse {
    pub items: Vec<CourseStudent>,
}
