//! 本地磁盘文件存储
//!
//! 上传文件按所有者分目录存放，存储名为 `{uuid}_{清理后的原始文件名}`，
//! 数据库只记录相对路径。

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::{LmsError, Result};

/// 已落盘文件的信息
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// 相对于上传根目录的路径，如 `user-id/uuid_report.pdf`
    pub relative_path: String,
    pub size: i64,
}

pub trait FileStore: Send + Sync {
    /// 写入文件，返回相对存储路径
    fn save(&self, owner_id: &str, original_name: &str, data: &[u8]) -> Result<StoredFile>;
    /// 读取文件内容
    fn read(&self, relative_path: &str) -> Result<Vec<u8>>;
    /// 删除文件（文件不存在视为成功）
    fn delete(&self, relative_path: &str) -> Result<()>;
    /// 文件是否存在
    fn exists(&self, relative_path: &str) -> bool;
}

/// 基于本地文件系统的存储实现
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        // 拒绝路径穿越
        let rel = Path::new(relative_path);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(LmsError::file_operation(format!(
                "非法的文件路径: {relative_path}"
            )));
        }
        Ok(self.root.join(rel))
    }
}

/// 清理原始文件名：去掉路径分隔符等危险字符，保留扩展名
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(['.', ' ']).to_string();
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed
    }
}

impl FileStore for LocalFileStore {
    fn save(&self, owner_id: &str, original_name: &str, data: &[u8]) -> Result<StoredFile> {
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original_name));
        let relative_path = format!("{owner_id}/{stored_name}");
        let full_path = self.resolve(&relative_path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| LmsError::file_operation(format!("创建上传目录失败: {e}")))?;
        }

        let mut f = fs::File::create(&full_path)
            .map_err(|e| LmsError::file_operation(format!("文件创建失败: {e}")))?;
        f.write_all(data)
            .map_err(|e| LmsError::file_operation(format!("文件写入失败: {e}")))?;

        Ok(StoredFile {
            relative_path,
            size: data.len() as i64,
        })
    }

    fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(relative_path)?;
        fs::read(&full_path).map_err(|e| LmsError::file_operation(format!("文件读取失败: {e}")))
    }

    fn delete(&self, relative_path: &str) -> Result<()> {
        let full_path = self.resolve(relative_path)?;
        match fs::remove_file(&full_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LmsError::file_operation(format!("文件删除失败: {e}"))),
        }
    }

    fn exists(&self, relative_path: &str) -> bool {
        self.resolve(relative_path)
            .map(|p| p.exists())
            .unwrap_or(false)
    }
}

/// 检查扩展名是否在允许列表内（不区分大小写，不带点）
pub fn extension_allowed(file_name: &str, allowed: &[String]) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            allowed.iter().any(|t| t.to_lowercase() == ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalFileStore {
        let dir = std::env::temp_dir().join(format!("lms-files-{}", Uuid::new_v4()));
        LocalFileStore::new(dir)
    }

    #[test]
    fn test_save_read_delete_roundtrip() {
        let store = temp_store();
        let stored = store.save("user-1", "report.pdf", b"hello").unwrap();
        assert!(stored.relative_path.starts_with("user-1/"));
        assert!(stored.relative_path.ends_with("_report.pdf"));
        assert_eq!(stored.size, 5);
        assert!(store.exists(&stored.relative_path));

        let data = store.read(&stored.relative_path).unwrap();
        assert_eq!(data, b"hello");

        store.delete(&stored.relative_path).unwrap();
        assert!(!store.exists(&stored.relative_path));
        // 再删一次不报错
        store.delete(&stored.relative_path).unwrap();
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("a/b\\c.txt"), "a_b_c.txt");
        assert_eq!(sanitize_file_name("..hidden"), "hidden");
        assert_eq!(sanitize_file_name("..."), "unnamed");
        assert_eq!(sanitize_file_name("report (1).pdf"), "report (1).pdf");
    }

    #[test]
    fn test_path_traversal_rejected() {
        let store = temp_store();
        assert!(store.read("../etc/passwd").is_err());
        assert!(!store.exists("../etc/passwd"));
    }

    #[test]
    fn test_extension_allowed() {
        let allowed: Vec<String> = ["pdf", "zip"].iter().map(|s| s.to_string()).collect();
        assert!(extension_allowed("a.PDF", &allowed));
        assert!(extension_allowed("archive.zip", &allowed));
        assert!(!extension_allowed("malware.exe", &allowed));
        assert!(!extension_allowed("noext", &allowed));
    }
}
