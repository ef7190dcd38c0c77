use serde::Deserialize;

/// 评分请求
#[derive(Debug, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: i32,
    pub feedback: Option<String>,
}

/// 更新评分请求
#[derive(Debug, Deserialize)]
pub struct UpdateGradeRequest {
    pub score: Option<i32>,
    pub feedback: Option<String>,
}
