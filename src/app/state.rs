// ==========================================
// 餐饮后厨管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// 说明: 全部仓储共享同一 SQLite 连接(统一 PRAGMA)
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use crate::api::{ClassificationApi, MediaApi, RecipeApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{ActionLogRepository, ClassificationRepository, RecipeRepository};
use crate::storage::{LocalMediaStorage, MediaStorage};

/// 默认数据库路径（数据目录下 kitchen-boh/kitchen-boh.db）
pub fn get_default_db_path() -> String {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("kitchen-boh");
    dir.join("kitchen-boh.db").to_string_lossy().to_string()
}

/// 应用状态
///
/// 包含所有 API 实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配方 API
    pub recipe_api: Arc<RecipeApi>,

    /// 媒体 API
    pub media_api: Arc<MediaApi>,

    /// 分类 API
    pub classification_api: Arc<ClassificationApi>,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 操作日志仓储(查询用)
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建 AppState(默认本地媒体存储)
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let storage = Arc::new(LocalMediaStorage::new(LocalMediaStorage::default_root()));
        Self::with_storage(db_path, storage)
    }

    /// 创建 AppState 并注入媒体存储实现(测试/嵌入方使用)
    pub fn with_storage(
        db_path: &str,
        storage: Arc<dyn MediaStorage>,
    ) -> Result<Self, Box<dyn Error>> {
        info!(db_path, "初始化 AppState");

        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        let conn: Arc<Mutex<Connection>> = Arc::new(Mutex::new(conn));

        let recipe_repo = Arc::new(RecipeRepository::from_connection(conn.clone()));
        let classification_repo =
            Arc::new(ClassificationRepository::from_connection(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn)?);

        let recipe_api = Arc::new(RecipeApi::new(
            recipe_repo.clone(),
            action_log_repo.clone(),
            config.clone(),
        ));
        let media_api = Arc::new(MediaApi::new(
            recipe_repo,
            action_log_repo.clone(),
            storage,
        ));
        let classification_api = Arc::new(ClassificationApi::new(classification_repo));

        Ok(Self {
            db_path: db_path.to_string(),
            recipe_api,
            media_api,
            classification_api,
            config,
            action_log_repo,
        })
    }
}
