use serde::Serialize;

use super::entities::Grade;

/// 评分详情（学生/教授列表视角，附作业与学生信息）
#[derive(Debug, Serialize)]
pub struct GradeDetail {
    #[serde(flatten)]
    pub grade: Grade,
    pub assignment_id: String,
    pub assignment_title: String,
    pub max_score: i32,
    pub student_id: String,
    pub student_name: String,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub grade: Grade,
}

#[derive(Debug, Serialize)]
pub struct GradeListResponse {
    pub items: Vec<GradeDetail>,
}
