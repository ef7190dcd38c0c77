use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn submit_assignment(
    req: HttpRequest,
    assignment_id: web::Path<String>,
    submit_data: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit_assignment(assignment_id.into_inner(), submit_data.into_inner(), &req)
        .await
}

pub async fn submit_with_files(
    req: HttpRequest,
    assignment_id: web::Path<String>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit_with_files(assignment_id.into_inner(), payload, &req)
        .await
}

pub async fn list_my_submissions(request: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_my_submissions(&request).await
}

pub async fn list_assignment_submissions(
    req: HttpRequest,
    assignment_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_assignment_submissions(assignment_id.into_inner(), &req)
        .await
}

pub async fn delete_submission_file(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (submission_id, file_id) = path.into_inner();
    SUBMISSION_SERVICE
        .delete_submission_file(submission_id, file_id, &req)
        .await
}

pub async fn download_submission_file(
    req: HttpRequest,
    file_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .download_submission_file(file_id.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/submissions")
            .wrap(middlewares::RequireJWT)
            .route(
                "/assignments/{id}/submit",
                web::post().to(submit_assignment),
            )
            .route(
                "/assignments/{id}/submit-with-files",
                web::post().to(submit_with_files),
            )
            .route("/my-submissions", web::get().to(list_my_submissions))
            .route(
                "/assignments/{id}/submissions",
                web::get().to(list_assignment_submissions),
            )
            .route(
                "/{submission_id}/files/{file_id}",
                web::delete().to(delete_submission_file),
            )
            .route(
                "/files/{file_id}/download",
                web::get().to(download_submission_file),
            ),
    );
}
