use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 创建作业请求
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub max_score: Option<i32>,
    pub course_id: Option<String>,
}

/// 更新作业请求
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式
    pub max_score: Option<i32>,
    pub course_id: Option<String>,
}
