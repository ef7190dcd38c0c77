use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::{AssignmentDetailResponse, AssignmentListResponse, AssignmentResponse},
    },
    users::entities::UserRole,
};
use crate::storage::Storage;

use super::AssignmentService;

pub async fn handle_list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_assignments().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询作业列表失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_create_assignment(
    service: &AssignmentService,
    create_request: CreateAssignmentRequest,
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
            "Only professors can create assignments",
        )));
    }

    if create_request.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Assignment title is required",
        )));
    }

    if let Some(max_score) = create_request.max_score
        && max_score <= 0
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidScore,
            "max_score must be a positive integer",
        )));
    }

    let storage = service.get_storage(request);

    // 关联课程存在性校验
    if let Some(ref course_id) = create_request.course_id {
        match storage.get_course_by_id(course_id).await {
            Ok(Some(_)) => {}
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
        }
    }

    match storage.create_assignment(&authed.id, create_request).await {
        Ok(assignment) => {
            tracing::info!("Assignment {} created by {}", assignment.id, authed.email);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AssignmentResponse { assignment },
                "作业创建成功",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建作业失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_get_assignment(
    service: &AssignmentService,
    assignment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(&assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    let professor_name = match storage.get_user_by_id(&assignment.professor_id).await {
        Ok(Some(user)) => user.full_name,
        Ok(None) => String::new(),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询教授信息失败: {e}"),
                )),
            );
        }
    };

    match storage.list_attachments(&assignment_id).await {
        Ok(attachments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentDetailResponse {
                assignment,
                professor_name,
                attachments,
            },
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询附件失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_update_assignment(
    service: &AssignmentService,
    assignment_id: String,
    update_request: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(&assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    if let Some(response) = check_assignment_owner(&assignment.professor_id, request) {
        return Ok(response);
    }

    if let Some(response) = check_assignment_unlocked(storage.as_ref(), &assignment_id).await {
        return Ok(response);
    }

    if let Some(max_score) = update_request.max_score
        && max_score <= 0
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidScore,
            "max_score must be a positive integer",
        )));
    }

    match storage.update_assignment(&assignment_id, update_request).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentResponse { assignment },
            "作业更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新作业失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_delete_assignment(
    service: &AssignmentService,
    assignment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(&assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    if let Some(response) = check_assignment_owner(&assignment.professor_id, request) {
        return Ok(response);
    }

    if let Some(response) = check_assignment_unlocked(storage.as_ref(), &assignment_id).await {
        return Ok(response);
    }

    // 先取附件列表，数据库删除成功后再清理磁盘
    let attachments = match storage.list_attachments(&assignment_id).await {
        Ok(attachments) => attachments,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询附件失败: {e}"),
                )),
            );
        }
    };

    match storage.delete_assignment(&assignment_id).await {
        Ok(true) => {
            let file_store = service.get_file_store(request);
            for attachment in &attachments {
                // 磁盘清理尽力而为，失败只记录日志
                if let Err(e) = file_store.delete(&attachment.file_path) {
                    tracing::warn!(
                        "Failed to remove attachment file {}: {}",
                        attachment.file_path,
                        e
                    );
                }
            }
            tracing::info!("Assignment {} deleted", assignment_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("作业删除成功")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除作业失败: {e}"),
            )),
        ),
    }
}

/// 仅作业所属教授或管理员可操作
pub(crate) fn check_assignment_owner(
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
            "Not the assignment owner",
        )))
    }
}

/// 已有评分的作业禁止编辑和删除，管理员也不例外
async fn check_assignment_unlocked(
    storage: &dyn Storage,
    assignment_id: &str,
) -> Option<HttpResponse> {
    match storage.assignment_has_grades(assignment_id).await {
        Ok(false) => None,
        Ok(true) => Some(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AssignmentLocked,
            "Assignment has graded submissions and cannot be modified",
        ))),
        Err(e) => Some(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询评分状态失败: {e}"),
            )),
        ),
    }
}
