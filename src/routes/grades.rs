use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{GradeSubmissionRequest, UpdateGradeRequest};
use crate::services::GradeService;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: web::Path<String>,
    grade_data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .grade_submission(submission_id.into_inner(), grade_data.into_inner(), &req)
        .await
}

pub async fn update_grade(
    req: HttpRequest,
    grade_id: web::Path<String>,
    update_data: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .update_grade(grade_id.into_inner(), update_data.into_inner(), &req)
        .await
}

pub async fn delete_grade(
    req: HttpRequest,
    grade_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.delete_grade(grade_id.into_inner(), &req).await
}

pub async fn list_my_grades(request: HttpRequest) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_my_grades(&request).await
}

pub async fn list_assignment_grades(
    req: HttpRequest,
    assignment_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_assignment_grades(assignment_id.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/grades")
            .wrap(middlewares::RequireJWT)
            .route(
                "/submissions/{id}/grade",
                web::post().to(grade_submission),
            )
            .route("/{id}", web::put().to(update_grade))
            .route("/{id}", web::delete().to(delete_grade))
            .route("/my-grades", web::get().to(list_my_grades))
            .route(
                "/assignments/{id}/grades",
                web::get().to(list_assignment_grades),
            ),
    );
}
