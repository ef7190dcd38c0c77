use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::entities::Assignment,
    auth::entities::AuthedUser,
    submissions::{
        requests::{NewSubmissionFile, SubmitAssignmentRequest},
        responses::{SubmissionDetailResponse, SubmissionListResponse, SubmissionResponse},
    },
    users::entities::UserRole,
};
use crate::services::assignments::management::check_assignment_owner;
use crate::services::multipart::collect_upload_form;
use crate::storage::{
    Storage,
    file_store::{FileStore, extension_allowed},
};
use uuid::Uuid;

use super::SubmissionService;

pub async fn handle_submit_assignment(
    service: &SubmissionService,
    assignment_id: String,
    submit_request: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let authed = match require_student(request) {
        Ok(authed) => authed,
        Err(response) => return Ok(response),
    };

    let content = match submit_request.content {
        Some(content) if !content.trim().is_empty() => content,
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Content is required",
            )));
        }
    };

    let storage = service.get_storage(request);

    let assignment = match load_assignment(storage.as_ref(), &assignment_id).await {
        Ok(assignment) => assignment,
        Err(response) => return Ok(response),
    };

    if assignment.is_past_due(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::DeadlinePassed,
            "Assignment deadline has passed",
        )));
    }

    // 首次提交 201，覆盖已有提交 200
    let created = match storage.get_submission_by_pair(&assignment_id, &authed.id).await {
        Ok(existing) => existing.is_none(),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    match storage
        .upsert_submission(&assignment_id, &authed.id, Some(content))
        .await
    {
        Ok(submission) => {
            tracing::info!(
                "Submission {} recorded for assignment {}",
                submission.id,
                assignment_id
            );
            let mut response = if created {
                HttpResponse::Created()
            } else {
                HttpResponse::Ok()
            };
            Ok(response.json(ApiResponse::success(
                SubmissionResponse { submission },
                "提交成功",
            )))
        }
        // 并发重复提交触发唯一约束，提示客户端重试
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::Conflict, "Concurrent submission, please retry"),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("提交失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_submit_with_files(
    service: &SubmissionService,
    assignment_id: String,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let authed = match require_student(request) {
        Ok(authed) => authed,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request);

    let assignment = match load_assignment(storage.as_ref(), &assignment_id).await {
        Ok(assignment) => assignment,
        Err(response) => return Ok(response),
    };

    if assignment.is_past_due(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::DeadlinePassed,
            "Assignment deadline has passed",
        )));
    }

    let config = AppConfig::get();

    let form = match collect_upload_form(&mut payload, config.upload.max_size).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    let content = form.content.filter(|c| !c.trim().is_empty());

    if content.is_none() && form.files.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EmptySubmission,
            "Submission must contain content or files",
        )));
    }

    // 扩展名全部先校验，避免写入一半再失败
    for file in &form.files {
        if !extension_allowed(&file.file_name, &config.upload.allowed_types) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileTypeNotAllowed,
                format!("File type not allowed: {}", file.file_name),
            )));
        }
    }

    // 附件按提交 ID 落盘；已有提交沿用其 ID，首次提交预生成
    let (submission_id, created) = match storage
        .get_submission_by_pair(&assignment_id, &authed.id)
        .await
    {
        Ok(Some(existing)) => (existing.id, false),
        Ok(None) => (Uuid::new_v4().to_string(), true),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    let file_store = service.get_file_store(request);

    // 先全部落盘，数据库记录随后在一个事务里写入；任何一步失败都回收已写入的文件
    let mut new_files = Vec::with_capacity(form.files.len());
    for file in &form.files {
        match file_store.save(&submission_id, &file.file_name, &file.data) {
            Ok(stored) => new_files.push(NewSubmissionFile {
                file_name: file.file_name.clone(),
                file_path: stored.relative_path,
                file_size: stored.size,
                mime_type: file.mime_type.clone(),
            }),
            Err(e) => {
                tracing::error!("Submission file write failed: {e}");
                cleanup_stored_files(file_store.as_ref(), &new_files);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::FileUploadFailed,
                        "File write failed",
                    )),
                );
            }
        }
    }

    let submission = match storage
        .submit_with_files(&submission_id, &assignment_id, &authed.id, content, &new_files)
        .await
    {
        Ok(submission) => submission,
        Err(e) if e.is_conflict() => {
            cleanup_stored_files(file_store.as_ref(), &new_files);
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::Conflict,
                "Concurrent submission, please retry",
            )));
        }
        Err(e) => {
            cleanup_stored_files(file_store.as_ref(), &new_files);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("提交失败: {e}"),
                )),
            );
        }
    };

    // 首次提交 201，覆盖已有提交 200
    let mut response = if created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };

    match storage.get_submission_detail(&submission.id).await {
        Ok(Some(detail)) => Ok(response.json(ApiResponse::success(
            SubmissionDetailResponse { submission: detail },
            "提交成功",
        ))),
        Ok(None) => Ok(response.json(ApiResponse::success(
            SubmissionResponse { submission },
            "提交成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询提交详情失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_list_my_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(authed) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let storage = service.get_storage(request);

    match storage.list_submissions_by_student(&authed.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询提交列表失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_list_assignment_submissions(
    service: &SubmissionService,
    assignment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match load_assignment(storage.as_ref(), &assignment_id).await {
        Ok(assignment) => assignment,
        Err(response) => return Ok(response),
    };

    if let Some(response) = check_assignment_owner(&assignment.professor_id, request) {
        return Ok(response);
    }

    match storage.list_submissions_for_assignment(&assignment_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询作业提交失败: {e}"),
            )),
        ),
    }
}

/// 回收已落盘但未入库的文件
fn cleanup_stored_files(file_store: &dyn FileStore, files: &[NewSubmissionFile]) {
    for file in files {
        if let Err(e) = file_store.delete(&file.file_path) {
            tracing::warn!("Failed to clean up orphan file {}: {}", file.file_path, e);
        }
    }
}

/// 提交操作仅对学生开放
fn require_student(request: &HttpRequest) -> Result<AuthedUser, HttpResponse> {
    let Some(authed) = RequireJWT::extract_user(request) else {
        return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    if authed.role != UserRole::Student {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only students can submit assignments",
        )));
    }

    Ok(authed)
}

async fn load_assignment(
    storage: &dyn Storage,
    assignment_id: &str,
) -> Result<Assignment, HttpResponse> {
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => Ok(assignment),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询作业失败: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::HttpMessage;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web;
    use migration::{Migrator, MigratorTrait};
    use std::sync::Arc;

    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::users::entities::{User, UserStatus};
    use crate::models::users::requests::CreateUserData;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn test_storage() -> Arc<dyn Storage> {
        let path = std::env::temp_dir().join(format!("lms-test-{}.db", Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let db = sea_orm::Database::connect(&url).await.expect("connect sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        Arc::new(SeaOrmStorage { db })
    }

    async fn seed_user(storage: &Arc<dyn Storage>, email: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUserData {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                full_name: "테스트사용자".to_string(),
                role,
                status: UserStatus::Approved,
            })
            .await
            .expect("create user")
    }

    /// 带学生身份的请求，存储句柄通过 app_data 注入
    fn student_request(storage: &Arc<dyn Storage>, student: &User) -> HttpRequest {
        let req = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(AuthedUser {
            id: student.id.clone(),
            email: student.email.clone(),
            role: UserRole::Student,
        });
        req
    }

    #[tokio::test]
    async fn test_first_submit_created_then_resubmit_ok() {
        let storage = test_storage().await;
        let professor = seed_user(&storage, "prof@office.kopo.ac.kr", UserRole::Professor).await;
        let student = seed_user(&storage, "stud@office.kopo.ac.kr", UserRole::Student).await;

        let assignment = storage
            .create_assignment(
                &professor.id,
                CreateAssignmentRequest {
                    title: "과제 1".to_string(),
                    description: None,
                    due_date: chrono::Utc::now() + chrono::Duration::days(7),
                    max_score: Some(100),
                    course_id: None,
                },
            )
            .await
            .expect("create assignment");

        let service = SubmissionService::new_lazy();

        let first = handle_submit_assignment(
            &service,
            assignment.id.clone(),
            SubmitAssignmentRequest {
                content: Some("첫 제출".to_string()),
            },
            &student_request(&storage, &student),
        )
        .await
        .expect("first submit");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = handle_submit_assignment(
            &service,
            assignment.id,
            SubmitAssignmentRequest {
                content: Some("수정본".to_string()),
            },
            &student_request(&storage, &student),
        )
        .await
        .expect("resubmit");
        assert_eq!(second.status(), StatusCode::OK);
    }
}
