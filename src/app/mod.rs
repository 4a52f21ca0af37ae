// ==========================================
// 餐饮后厨管理系统 - 应用层
// ==========================================
// 职责: 组合根(仓储/引擎/API 装配),供嵌入方使用
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
