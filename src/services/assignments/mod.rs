pub mod attachments;
pub mod management;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::{FileStore, Storage};

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_file_store(&self, request: &HttpRequest) -> Arc<dyn FileStore> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn FileStore>>>()
            .expect("FileStore not found in app data")
            .get_ref()
            .clone()
    }

    // 作业列表
    pub async fn list_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        management::handle_list_assignments(self, request).await
    }

    // 创建作业
    pub async fn create_assignment(
        &self,
        create_request: crate::models::assignments::requests::CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_create_assignment(self, create_request, request).await
    }

    // 作业详情（含附件列表）
    pub async fn get_assignment(
        &self,
        assignment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_get_assignment(self, assignment_id, request).await
    }

    // 更新作业
    pub async fn update_assignment(
        &self,
        assignment_id: String,
        update_request: crate::models::assignments::requests::UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_update_assignment(self, assignment_id, update_request, request).await
    }

    // 删除作业
    pub async fn delete_assignment(
        &self,
        assignment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_delete_assignment(self, assignment_id, request).await
    }

    // 上传作业附件
    pub async fn upload_attachment(
        &self,
        assignment_id: String,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attachments::handle_upload_attachment(self, assignment_id, payload, request).await
    }

    // 列出作业附件
    pub async fn list_attachments(
        &self,
        assignment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attachments::handle_list_attachments(self, assignment_id, request).await
    }

    // 下载作业附件
    pub async fn download_attachment(
        &self,
        attachment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attachments::handle_download_attachment(self, attachment_id, request).await
    }

    // 删除作业附件
    pub async fn delete_attachment(
        &self,
        attachment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attachments::handle_delete_attachment(self, attachment_id, request).await
    }
}
