use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    files::responses::{AttachmentListResponse, AttachmentResponse},
};
use crate::services::multipart::{attachment_disposition, collect_upload_form};
use crate::storage::file_store::extension_allowed;

use super::AssignmentService;
use super::management::check_assignment_owner;

pub async fn handle_upload_attachment(
    service: &AssignmentService,
    assignment_id: String,
    mut payload: Multipart,
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

    let config = AppConfig::get();

    let form = match collect_upload_form(&mut payload, config.upload.max_size).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    let mut files = form.files;
    let file = match files.len() {
        0 => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "No file found in upload payload",
            )));
        }
        1 => files.remove(0),
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Only one file can be uploaded at a time",
            )));
        }
    };

    if !extension_allowed(&file.file_name, &config.upload.allowed_types) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileTypeNotAllowed,
            "File type not allowed",
        )));
    }

    let file_store = service.get_file_store(request);

    // 先落盘再写数据库记录
    let stored = match file_store.save(&assignment_id, &file.file_name, &file.data) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::error!("Attachment write failed: {e}");
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    "File write failed",
                )),
            );
        }
    };

    match storage
        .add_attachment(
            &assignment_id,
            &file.file_name,
            &stored.relative_path,
            stored.size,
            &file.mime_type,
        )
        .await
    {
        Ok(attachment) => Ok(HttpResponse::Created().json(ApiResponse::success(
            AttachmentResponse { attachment },
            "附件上传成功",
        ))),
        Err(e) => {
            // 数据库失败时回收已写入的文件，避免孤儿
            if let Err(cleanup) = file_store.delete(&stored.relative_path) {
                tracing::warn!(
                    "Failed to clean up orphan file {}: {}",
                    stored.relative_path,
                    cleanup
                );
            }
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    format!("保存附件记录失败: {e}"),
                )),
            )
        }
    }
}

pub async fn handle_list_attachments(
    service: &AssignmentService,
    assignment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_assignment_by_id(&assignment_id).await {
        Ok(Some(_)) => {}
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
    }

    match storage.list_attachments(&assignment_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttachmentListResponse { items },
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

pub async fn handle_download_attachment(
    service: &AssignmentService,
    attachment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let attachment = match storage.get_attachment_by_id(&attachment_id).await {
        Ok(Some(attachment)) => attachment,
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
                    format!("查询附件失败: {e}"),
                )),
            );
        }
    };

    let file_store = service.get_file_store(request);

    let bytes = match file_store.read(&attachment.file_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Attachment read failed for {}: {}", attachment.file_path, e);
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File missing from storage",
            )));
        }
    };

    // 用原始文件名作为下载名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header(attachment_disposition(&attachment.file_name))
        .body(bytes))
}

pub async fn handle_delete_attachment(
    service: &AssignmentService,
    attachment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let attachment = match storage.get_attachment_by_id(&attachment_id).await {
        Ok(Some(attachment)) => attachment,
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
                    format!("查询附件失败: {e}"),
                )),
            );
        }
    };

    let assignment = match storage.get_assignment_by_id(&attachment.assignment_id).await {
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

    match storage.delete_attachment(&attachment_id).await {
        Ok(true) => {
            // 磁盘清理尽力而为
            let file_store = service.get_file_store(request);
            if let Err(e) = file_store.delete(&attachment.file_path) {
                tracing::warn!(
                    "Failed to remove attachment file {}: {}",
                    attachment.file_path,
                    e
                );
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("附件删除成功")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除附件失败: {e}"),
            )),
        ),
    }
}
