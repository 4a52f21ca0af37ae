// ==========================================
// 餐饮后厨管理系统 - 分类层级仓储
// ==========================================
// 职责: 管理 major_groups / categories / sub_categories 参考数据
// 红线: 不含业务逻辑,级联过滤由引擎层负责
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::classification::{Category, MajorGroup, SubCategory};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

fn parse_datetime(text: String) -> DateTime<Utc> {
    text.parse::<DateTime<Utc>>()
        .unwrap_or_else(|_| Utc::now())
}

pub struct ClassificationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassificationRepository {
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

    // ==========================================
    // 查询
    // ==========================================

    pub fn list_major_groups(&self, organization_id: &str) -> RepositoryResult<Vec<MajorGroup>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, organization_id, name, created_at
             FROM major_groups WHERE organization_id = ?1 ORDER BY name",
        )?;
        let rows = stmt
            .query_map(params![organization_id], |row| {
                Ok(MajorGroup {
                    id: row.get(0)?,
                    organization_id: row.get(1)?,
                    name: row.get(2)?,
                    created_at: parse_datetime(row.get(3)?),
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn list_categories(&self, organization_id: &str) -> RepositoryResult<Vec<Category>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, organization_id, group_id, name, created_at
             FROM categories WHERE organization_id = ?1 ORDER BY name",
        )?;
        let rows = stmt
            .query_map(params![organization_id], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    organization_id: row.get(1)?,
                    group_id: row.get(2)?,
                    name: row.get(3)?,
                    created_at: parse_datetime(row.get(4)?),
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn list_sub_categories(&self, organization_id: &str) -> RepositoryResult<Vec<SubCategory>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, organization_id, category_id, name, created_at
             FROM sub_categories WHERE organization_id = ?1 ORDER BY name",
        )?;
        let rows = stmt
            .query_map(params![organization_id], |row| {
                Ok(SubCategory {
                    id: row.get(0)?,
                    organization_id: row.get(1)?,
                    category_id: row.get(2)?,
                    name: row.get(3)?,
                    created_at: parse_datetime(row.get(4)?),
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    // ==========================================
    // 写入
    // ==========================================

    pub fn insert_major_group(&self, group: &MajorGroup) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO major_groups (id, organization_id, name, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                group.id,
                group.organization_id,
                group.name,
                group.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn insert_category(&self, category: &Category) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO categories (id, organization_id, group_id, name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                category.id,
                category.organization_id,
                category.group_id,
                category.name,
                category.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn insert_sub_category(&self, sub_category: &SubCategory) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO sub_categories (id, organization_id, category_id, name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                sub_category.id,
                sub_category.organization_id,
                sub_category.category_id,
                sub_category.name,
                sub_category.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }
}
