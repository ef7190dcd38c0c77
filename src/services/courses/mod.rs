pub mod enrollment;
pub mod management;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
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

    // 课程列表
    pub async fn list_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        management::handle_list_courses(self, request).await
    }

    // 创建课程
    pub async fn create_course(
        &self,
        create_request: crate::models::courses::requests::CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_create_course(self, create_request, request).await
    }

    // 课程详情（含学生列表）
    pub async fn get_course(
        &self,
        course_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_get_course(self, course_id, request).await
    }

    // 更新课程
    pub async fn update_course(
        &self,
        course_id: String,
        update_request: crate::models::courses::requests::UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_update_course(self, course_id, update_request, request).await
    }

    // 删除课程
    pub async fn delete_course(
        &self,
        course_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        management::handle_delete_course(self, course_id, request).await
    }

    // 学生选课
    pub async fn enroll_student(
        &self,
        course_id: String,
        enroll_request: crate::models::courses::requests::EnrollStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::handle_enroll_student(self, course_id, enroll_request, request).await
    }

    // 学生退课
    pub async fn remove_student(
        &self,
        course_id: String,
        student_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::handle_remove_student(self, course_id, student_id, request).await
    }

    // 学生名册
    pub async fn list_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        enrollment::handle_list_students(self, request).await
    }
}
