// ==========================================
// 餐饮后厨管理系统 - 媒体存储 Trait
// ==========================================
// 职责: 定义媒体对象存储接口（不包含实现）
// 红线: 核心只持有返回的公开 URL 字符串,不感知存储内部
// ==========================================

use crate::storage::error::StorageResult;
use async_trait::async_trait;

// ==========================================
// MediaStorage Trait
// ==========================================
// 用途: 媒体上传/删除主接口
// 实现者: LocalMediaStorage
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// 上传二进制对象
    ///
    /// # 参数
    /// - path: 对象路径(形如 org/recipes/recipe_id/timestamp_filename)
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(String): 公开访问 URL
    /// - Err: 路径非法、写入失败
    async fn upload(&self, path: &str, bytes: &[u8]) -> StorageResult<String>;

    /// 删除对象
    ///
    /// # 参数
    /// - path: 对象路径
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// 从公开 URL 还原对象路径(非本存储签发的 URL 返回 None)
    fn object_path(&self, url: &str) -> Option<String>;
}
