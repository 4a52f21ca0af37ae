// ==========================================
// 餐饮后厨管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键常量
pub mod config_keys {
    /// 默认时薪(人工成本)
    pub const DEFAULT_LABOR_COST_PER_HOUR: &str = "costing/default_labor_cost_per_hour";
    /// 默认目标成本占比(%)
    pub const DEFAULT_TARGET_COST_PERCENT: &str = "costing/default_target_cost_percent";
    /// 货币代码
    pub const CURRENCY_CODE: &str = "display/currency_code";
    /// 界面语言
    pub const LOCALE: &str = "display/locale";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    // ==========================================
    // 类型化读取
    // ==========================================

    /// 默认时薪（新配方未填写 labor_cost_per_hour 时使用）
    pub fn get_default_labor_cost_per_hour(&self) -> Result<f64, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::DEFAULT_LABOR_COST_PER_HOUR, "18.0")?;
        Ok(value.parse::<f64>().unwrap_or(18.0))
    }

    /// 默认目标成本占比(%)
    pub fn get_default_target_cost_percent(&self) -> Result<f64, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::DEFAULT_TARGET_COST_PERCENT, "30.0")?;
        Ok(value.parse::<f64>().unwrap_or(30.0))
    }

    /// 货币代码
    pub fn get_currency_code(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::CURRENCY_CODE, "USD")
    }

    /// 界面语言
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::LOCALE, "zh-CN")
    }
}
