use serde::{Deserialize, Serialize};

// 评分实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: String,
    pub submission_id: String,
    pub score: i32,
    pub feedback: Option<String>,
    pub graded_by: String,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}
