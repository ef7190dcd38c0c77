use serde::Serialize;

use super::entities::Assignment;
use crate::models::files::entities::Attachment;

/// 作业列表项（附带教授姓名与附件数量）
#[derive(Debug, Serialize)]
pub struct AssignmentListItem {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub professor_name: String,
    pub attachment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub items: Vec<AssignmentListItem>,
}

/// 作业详情（附带附件列表）
#[derive(Debug, Serialize)]
pub struct AssignmentDetailResponse {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub professor_name: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub assignment: Assignment,
}
