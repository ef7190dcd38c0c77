use serde::Serialize;

use super::entities::Attachment;

#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub attachment: Attachment,
}

#[derive(Debug, Serialize)]
pub struct AttachmentListResponse {
    pub items: Vec<Attachment>,
}
