pub mod grading;
pub mod listing;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    // 评分/重新评分
    pub async fn grade_submission(
        &self,
        submission_id: String,
        grade_request: crate::models::grades::requests::GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::handle_grade_submission(self, submission_id, grade_request, request).await
    }

    // 修改评分
    pub async fn update_grade(
        &self,
        grade_id: String,
        update_request: crate::models::grades::requests::UpdateGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::handle_update_grade(self, grade_id, update_request, request).await
    }

    // 撤销评分
    pub async fn delete_grade(
        &self,
        grade_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grading::handle_delete_grade(self, grade_id, request).await
    }

    // 我的成绩（学生视角）
    pub async fn list_my_grades(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        listing::handle_list_my_grades(self, request).await
    }

    // 作业下的成绩（教授视角）
    pub async fn list_assignment_grades(
        &self,
        assignment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        listing::handle_list_assignment_grades(self, assignment_id, request).await
    }
}
