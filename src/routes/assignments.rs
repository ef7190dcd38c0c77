use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::services::AssignmentService;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(request: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&request).await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(assignment_data.into_inner(), &req)
        .await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(assignment_id.into_inner(), &req)
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: web::Path<String>,
    update_data: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(assignment_id.into_inner(), update_data.into_inner(), &req)
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(assignment_id.into_inner(), &req)
        .await
}

pub async fn upload_attachment(
    req: HttpRequest,
    assignment_id: web::Path<String>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .upload_attachment(assignment_id.into_inner(), payload, &req)
        .await
}

pub async fn list_attachments(
    req: HttpRequest,
    assignment_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_attachments(assignment_id.into_inner(), &req)
        .await
}

pub async fn download_attachment(
    req: HttpRequest,
    attachment_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .download_attachment(attachment_id.into_inner(), &req)
        .await
}

pub async fn delete_attachment(
    req: HttpRequest,
    attachment_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_attachment(attachment_id.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignments")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_assignments))
            .route("", web::post().to(create_assignment))
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}", web::put().to(update_assignment))
            .route("/{id}", web::delete().to(delete_assignment))
            .route("/{id}/upload", web::post().to(upload_attachment))
            .route("/{id}/files", web::get().to(list_attachments))
            .route(
                "/files/{file_id}/download",
                web::get().to(download_attachment),
            )
            .route("/files/{file_id}", web::delete().to(delete_attachment)),
    );
}
