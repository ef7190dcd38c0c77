use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::AdminService;

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn list_pending_users(request: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_pending_users(&request).await
}

pub async fn approve_user(
    req: HttpRequest,
    user_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.approve_user(user_id.into_inner(), &req).await
}

pub async fn reject_user(
    req: HttpRequest,
    user_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.reject_user(user_id.into_inner(), &req).await
}

// 配置路由（整个作用域仅管理员可用）
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/pending-users", web::get().to(list_pending_users))
                    .route("/users/{id}/approve", web::post().to(approve_user))
                    .route("/users/{id}/reject", web::post().to(reject_user)),
            ),
    );
}
