pub mod approval;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
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

    // 列出待审批用户
    pub async fn list_pending_users(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        approval::handle_list_pending_users(self, request).await
    }

    // 批准用户
    pub async fn approve_user(
        &self,
        user_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        approval::handle_approve_user(self, user_id, request).await
    }

    // 拒绝用户
    pub async fn reject_user(
        &self,
        user_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        approval::handle_reject_user(self, user_id, request).await
    }
}
