use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{
        requests::{CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseListResponse, CourseResponse, CourseStudentListResponse},
    },
    users::entities::UserRole,
};

use super::CourseService;

pub async fn handle_list_courses(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_courses().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询课程列表失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_create_course(
    service: &CourseService,
    create_request: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(authed) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    if authed.role == UserRole::Student {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only professors can create courses",
        )));
    }

    if create_request.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Course name is required",
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_course(&authed.id, create_request).await {
        Ok(course) => {
            tracing::info!("Course {} created by {}", course.id, authed.email);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CourseResponse { course },
                "课程创建成功",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建课程失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_get_course(
    service: &CourseService,
    course_id: String,
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

    match storage.list_course_students(&course_id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            serde_json::json!({
                "course": course,
                "students": CourseStudentListResponse { items: students },
            }),
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询课程学生失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_update_course(
    service: &CourseService,
    course_id: String,
    update_request: UpdateCourseRequest,
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

    if let Some(ref name) = update_request.name
        && name.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Course name cannot be empty",
        )));
    }

    match storage.update_course(&course_id, update_request).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseResponse { course },
            "课程更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新课程失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_delete_course(
    service: &CourseService,
    course_id: String,
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

    match storage.delete_course(&course_id).await {
        Ok(true) => {
            tracing::info!("Course {} deleted", course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课程删除成功")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除课程失败: {e}"),
            )),
        ),
    }
}

/// 仅课程所属教授或管理员可操作
pub(super) fn check_course_owner(
    professor_id: &str,
    request: &HttpRequest,
) -> Option<HttpResponse> {
    let Some(authed) = RequireJWT::extract_user(request) else {
        return Some(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    if authed.role == UserRole::Admin || authed.id == professor_id {
        None
    } else {
        Some(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Not the course owner",
        )))
    }
}
