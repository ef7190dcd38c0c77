use serde::Serialize;

use super::entities::Submission;
use crate::models::files::entities::SubmissionFile;
use crate::models::grades::entities::Grade;

/// 提交关联的作业信息
#[derive(Debug, Serialize)]
pub struct SubmissionAssignmentInfo {
    pub id: String,
    pub title: String,
    pub max_score: i32,
    pub due_date: chrono::DateTime<chrono::Utc>,
}

/// 提交者信息
#[derive(Debug, Serialize)]
pub struct SubmissionStudentInfo {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

/// 提交详情（含作业、提交者、附件与评分）
#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: Submission,
    pub assignment: SubmissionAssignmentInfo,
    pub student: SubmissionStudentInfo,
    pub files: Vec<SubmissionFile>,
    pub grade: Option<Grade>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub submission: Submission,
}

#[derive(Debug, Serialize)]
pub struct SubmissionDetailResponse {
    pub submission: SubmissionDetail,
}

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionDetail>,
}
