use serde::{Deserialize, Serialize};

// 作业附件（教授上传的题目附件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub assignment_id: String,
    // 原始文件名
    pub file_name: String,
    #[serde(skip_serializing, default)] // 存储路径不暴露给客户端
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

// 提交附件（学生随提交上传的文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionFile {
    pub id: String,
    pub submission_id: String,
    pub file_name: String,
    #[serde(skip_serializing, default)]
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
