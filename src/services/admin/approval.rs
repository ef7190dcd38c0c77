use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserStatus,
        responses::{UserListResponse, UserResponse},
    },
};

use super::AdminService;

pub async fn handle_list_pending_users(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_pending_users().await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserListResponse { items: users },
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询待审批用户失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_approve_user(
    service: &AdminService,
    user_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    update_status(service, user_id, UserStatus::Approved, request).await
}

pub async fn handle_reject_user(
    service: &AdminService,
    user_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    update_status(service, user_id, UserStatus::Rejected, request).await
}

async fn update_status(
    service: &AdminService,
    user_id: String,
    status: UserStatus,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.update_user_status(&user_id, status).await {
        Ok(Some(user)) => {
            tracing::info!("User {} status changed to {}", user.email, status);
            Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse { user }, "审批完成")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("审批失败: {e}"),
            )),
        ),
    }
}
