//! multipart/form-data 解析辅助
//!
//! 把上传表单收集为内存结构，字段约定：`content` 为文本，`file` / `files`
//! 为文件。大小超限直接返回可用的 400 响应。

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use futures_util::StreamExt;
use futures_util::TryStreamExt;

use crate::models::{ApiResponse, ErrorCode};

/// 表单中的单个上传文件
pub(crate) struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// 收集后的整个表单
pub(crate) struct UploadForm {
    pub content: Option<String>,
    pub files: Vec<UploadedFile>,
}

/// 读取整个 multipart 表单，单文件超过 `max_size` 字节即拒绝
pub(crate) async fn collect_upload_form(
    payload: &mut Multipart,
    max_size: usize,
) -> Result<UploadForm, HttpResponse> {
    let mut content: Option<String> = None;
    let mut files = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "content" => {
                let mut buf = Vec::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk.map_err(|e| {
                        bad_request(format!("Failed to read form field: {e}"))
                    })?;
                    buf.extend_from_slice(&data);
                }
                content = Some(String::from_utf8_lossy(&buf).into_owned());
            }
            "file" | "files" => {
                let file_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let mime_type = field
                    .content_type()
                    .map(|ct| ct.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let bytes = chunk.map_err(|e| {
                        bad_request(format!("Failed to read upload stream: {e}"))
                    })?;
                    data.extend_from_slice(&bytes);
                    if data.len() > max_size {
                        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::FileSizeExceeded,
                            "File size exceeds the limit",
                        )));
                    }
                }

                files.push(UploadedFile {
                    file_name,
                    mime_type,
                    data,
                });
            }
            _ => {
                // 未知字段直接丢弃
                while let Some(chunk) = field.next().await {
                    if chunk.is_err() {
                        break;
                    }
                }
            }
        }
    }

    Ok(UploadForm { content, files })
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
}

/// 下载响应的 Content-Disposition
///
/// ASCII 文件名走带转义的 quoted-string，非 ASCII（如韩文文件名）
/// 走 RFC 5987 的 `filename*` 编码，避免产生非法响应头。
pub(crate) fn attachment_disposition(file_name: &str) -> ContentDisposition {
    let param = if file_name.is_ascii() {
        DispositionParam::Filename(file_name.to_string())
    } else {
        DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: file_name.as_bytes().to_vec(),
        })
    };

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![param],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition_escapes_quotes() {
        let header = attachment_disposition("a\"b\\c.pdf").to_string();
        assert_eq!(header, "attachment; filename=\"a\\\"b\\\\c.pdf\"");
    }

    #[test]
    fn test_attachment_disposition_encodes_hangul_names() {
        let header = attachment_disposition("보고서.pdf").to_string();
        assert!(header.starts_with("attachment; filename*=UTF-8''"));
        // UTF-8 字节必须百分号编码（보 = EB B3 B4）
        assert!(header.contains("%EB%B3%B4"));
    }
}
