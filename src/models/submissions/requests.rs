use serde::Deserialize;

/// 提交作业请求（纯文本提交）
#[derive(Debug, Deserialize)]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
}

/// 已落盘、待登记的提交附件（用于存储层，路径为文件库相对路径）
#[derive(Debug, Clone)]
pub struct NewSubmissionFile {
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
}
