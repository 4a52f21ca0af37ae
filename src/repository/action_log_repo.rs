// ==========================================
// 餐饮后厨管理系统 - 操作日志仓储
// ==========================================
// 职责: action_log 表的追加与查询
// 红线: append-only,不提供更新/删除
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加操作日志
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<()> {
        let detail_text = match &log.detail {
            Some(value) => serde_json::to_string(value)
                .map_err(|e| RepositoryError::field_value("detail", e.to_string()))?,
            None => "{}".to_string(),
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO action_log (
                id, organization_id, action_type, entity_id, operator, detail, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                log.id,
                log.organization_id,
                log.action_type.as_str(),
                log.entity_id,
                log.operator,
                detail_text,
                log.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 查询组织下最近的操作日志(按时间倒序)
    pub fn list_by_organization(
        &self,
        organization_id: &str,
        limit: u32,
    ) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, organization_id, action_type, entity_id, operator, detail, created_at
            FROM action_log
            WHERE organization_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt
            .query_map(params![organization_id, limit], |row| {
                let action_type_text: String = row.get(2)?;
                let action_type = ActionType::parse(&action_type_text).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        format!("无法识别的操作类型: {}", action_type_text).into(),
                    )
                })?;

                let detail_text: String = row.get(5)?;
                let detail = serde_json::from_str(&detail_text).ok();

                Ok(ActionLog {
                    id: row.get(0)?,
                    organization_id: row.get(1)?,
                    action_type,
                    entity_id: row.get(3)?,
                    operator: row.get(4)?,
                    detail,
                    created_at: row
                        .get::<_, String>(6)?
                        .parse::<DateTime<Utc>>()
                        .unwrap_or_else(|_| Utc::now()),
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}
