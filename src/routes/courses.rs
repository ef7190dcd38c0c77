use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{
    CreateCourseRequest, EnrollStudentRequest, UpdateCourseRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(request: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&request).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(course_data.into_inner(), &req)
        .await
}

pub async fn get_course(req: HttpRequest, course_id: web::Path<String>) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(course_id.into_inner(), &req).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: web::Path<String>,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(course_id.into_inner(), update_data.into_inner(), &req)
        .await
}

pub async fn delete_course(
    req: HttpRequest,
    course_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .delete_course(course_id.into_inner(), &req)
        .await
}

pub async fn enroll_student(
    req: HttpRequest,
    course_id: web::Path<String>,
    enroll_data: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .enroll_student(course_id.into_inner(), enroll_data.into_inner(), &req)
        .await
}

pub async fn remove_student(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (course_id, student_id) = path.into_inner();
    COURSE_SERVICE
        .remove_student(course_id, student_id, &req)
        .await
}

pub async fn list_students(request: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_students(&request).await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/courses")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_courses))
            .route("", web::post().to(create_course))
            .route("/{id}", web::get().to(get_course))
            .route("/{id}", web::put().to(update_course))
            .route("/{id}", web::delete().to(delete_course))
            .route("/{id}/students", web::post().to(enroll_student))
            .route(
                "/{id}/students/{student_id}",
                web::delete().to(remove_student),
            ),
    );

    // 学生名册（选课录入时选人用，教授/管理员可见）
    cfg.service(
        web::scope("/api/users")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("/students", web::get().to(list_students)),
            ),
    );
}
