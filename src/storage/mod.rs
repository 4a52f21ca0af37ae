// ==========================================
// 餐饮后厨管理系统 - 媒体对象存储
// ==========================================
// 职责: 定义对象存储边界(上传返回公开 URL),核心不感知存储内部
// ==========================================

pub mod error;
pub mod local_media_storage;
pub mod media_storage_trait;

pub use error::{StorageError, StorageResult};
pub use local_media_storage::LocalMediaStorage;
pub use media_storage_trait::MediaStorage;
