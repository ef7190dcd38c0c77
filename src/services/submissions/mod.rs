pub mod files;
pub mod submit;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::{FileStore, Storage};

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    // 提交作业（纯文本）
    pub async fn submit_assignment(
        &self,
        assignment_id: String,
        submit_request: crate::models::submissions::requests::SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::handle_submit_assignment(self, assignment_id, submit_request, request).await
    }

    // 提交作业（带附件）
    pub async fn submit_with_files(
        &self,
        assignment_id: String,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::handle_submit_with_files(self, assignment_id, payload, request).await
    }

    // 我的提交列表
    pub async fn list_my_submissions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        submit::handle_list_my_submissions(self, request).await
    }

    // 作业下的提交列表（教授视角）
    pub async fn list_assignment_submissions(
        &self,
        assignment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::handle_list_assignment_submissions(self, assignment_id, request).await
    }

    // 删除提交附件
    pub async fn delete_submission_file(
        &self,
        submission_id: String,
        file_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        files::handle_delete_submission_file(self, submission_id, file_id, request).await
    }

    // 下载提交附件
    pub async fn download_submission_file(
        &self,
        file_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        files::handle_download_submission_file(self, file_id, request).await
    }
}
