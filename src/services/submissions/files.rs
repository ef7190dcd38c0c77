use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::multipart::attachment_disposition;

use super::SubmissionService;

pub async fn handle_delete_submission_file(
    service: &SubmissionService,
    submission_id: String,
    file_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(authed) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let storage = service.get_storage(request);

    // 归属校验：提交必须属于当前学生，文件必须挂在该提交下。
    // 不满足时统一返回 404，不暴露资源是否存在。
    let submission = match storage.get_submission_by_id(&submission_id).await {
        Ok(Some(submission)) if submission.student_id == authed.id => submission,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    let file = match storage.get_submission_file_by_id(&file_id).await {
        Ok(Some(file)) if file.submission_id == submission.id => file,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交附件失败: {e}"),
                )),
            );
        }
    };

    // 先删磁盘文件再删记录；文件已不存在不算失败
    let file_store = service.get_file_store(request);
    if let Err(e) = file_store.delete(&file.file_path) {
        tracing::error!("Failed to remove file {}: {}", file.file_path, e);
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "File removal failed",
            )),
        );
    }

    match storage.delete_submission_file(&file_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("附件删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除提交附件失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_download_submission_file(
    service: &SubmissionService,
    file_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(authed) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let storage = service.get_storage(request);

    let file = match storage.get_submission_file_by_id(&file_id).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交附件失败: {e}"),
                )),
            );
        }
    };

    // 学生只能下载自己的附件，教授和管理员不受限
    if authed.role == UserRole::Student {
        let owned = match storage.get_submission_by_id(&file.submission_id).await {
            Ok(Some(submission)) => submission.student_id == authed.id,
            Ok(None) => false,
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询提交失败: {e}"),
                    )),
                );
            }
        };

        if !owned {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
    }

    let file_store = service.get_file_store(request);

    let bytes = match file_store.read(&file.file_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("File read failed for {}: {}", file.file_path, e);
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File missing from storage",
            )));
        }
    };

    // 用原始文件名作为下载名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header(attachment_disposition(&file.file_name))
        .body(bytes))
}
