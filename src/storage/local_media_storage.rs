// ==========================================
// 餐饮后厨管理系统 - 本地文件系统媒体存储
// ==========================================
// 职责: MediaStorage 的本地实现,文件写入 root 目录,
//       URL 形如 {public_base}/{path}
// 红线: 拒绝包含 ".." 或以 "/" 开头的对象路径
// ==========================================

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::media_storage_trait::MediaStorage;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认公开 URL 前缀
pub const DEFAULT_PUBLIC_BASE: &str = "/media";

pub struct LocalMediaStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalMediaStorage {
    /// 创建本地媒体存储
    ///
    /// # 参数
    /// - root: 对象文件根目录
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base: DEFAULT_PUBLIC_BASE.to_string(),
        }
    }

    /// 指定公开 URL 前缀
    pub fn with_public_base(root: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// 默认媒体根目录（数据目录下 kitchen-boh/media）
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kitchen-boh")
            .join("media")
    }

    /// 对象路径校验 + 绝对路径拼接
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty()
            || path.starts_with('/')
            || Path::new(path)
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(&self, path: &str, bytes: &[u8]) -> StorageResult<String> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, bytes).await?;
        debug!(path = %path, size = bytes.len(), "媒体对象写入完成");
        Ok(format!("{}/{}", self.public_base, path))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let full_path = self.resolve(path)?;
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn object_path(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/", self.public_base);
        url.strip_prefix(&prefix).map(|p| p.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());

        let url = storage
            .upload("org-1/recipes/r-1/1_photo.jpg", b"binary")
            .await
            .unwrap();
        assert_eq!(url, "/media/org-1/recipes/r-1/1_photo.jpg");
        assert!(dir.path().join("org-1/recipes/r-1/1_photo.jpg").exists());

        let path = storage.object_path(&url).unwrap();
        storage.delete(&path).await.unwrap();
        assert!(!dir.path().join("org-1/recipes/r-1/1_photo.jpg").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());
        assert!(matches!(
            storage.delete("org-1/none.jpg").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reject_traversal_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());
        assert!(matches!(
            storage.upload("../escape.jpg", b"x").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.upload("/abs.jpg", b"x").await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_object_path_roundtrip() {
        let storage = LocalMediaStorage::new("/tmp/media-root");
        assert_eq!(
            storage.object_path("/media/org/recipes/r/1_a.jpg").as_deref(),
            Some("org/recipes/r/1_a.jpg")
        );
        assert_eq!(storage.object_path("https://other/cdn/a.jpg"), None);
    }
}
