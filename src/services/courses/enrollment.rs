use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::EnrollStudentRequest,
    users::{entities::UserRole, responses::StudentListResponse},
};

use super::CourseService;
use super::management::check_course_owner;

pub async fn handle_enroll_student(
    service: &CourseService,
    course_id: String,
    enroll_request: EnrollStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let course = match storage.get_course_by_id(&course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询课程失败: {e}"),
                )),
            );
        }
    };

    if let Some(response) = check_course_owner(&course.professor_id, request) {
        return Ok(response);
    }

    let student = match storage.get_user_by_id(&enroll_request.student_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询学生失败: {e}"),
                )),
            );
        }
    };

    if student.role != UserRole::Student {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Only students can be enrolled",
        )));
    }

    match storage.enroll_student(&course_id, &student.id).await {
        Ok(()) => {
            tracing::info!("Student {} enrolled in course {}", student.email, course_id);
            Ok(HttpResponse::Created().json(ApiResponse::success_empty("选课成功")))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AlreadyEnrolled, "Student already enrolled"),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("选课失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_remove_student(
    service: &CourseService,
    course_id: String,
    student_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let course = match storage.get_course_by_id(&course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询课程失败: {e}"),
                )),
            );
        }
    };

    if let Some(response) = check_course_owner(&course.professor_id, request) {
        return Ok(response);
    }

    match storage.remove_student(&course_id, &student_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("退课成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("退课失败: {e}"),
            )),
        ),
    }
}

// 学生名册（教授/管理员录入选课时选人用，角色由路由中间件把关）
pub async fn handle_list_students(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_students().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询学生名册失败: {e}"),
            )),
        ),
    }
}
