// ==========================================
// 餐饮后厨管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供内置建表（CREATE TABLE IF NOT EXISTS），首次启动即可用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// 说明：
/// - 全部使用 CREATE TABLE IF NOT EXISTS，重复调用安全
/// - 子表与 recipes 之间使用外键 + ON DELETE CASCADE，
///   删除配方时子记录随之删除
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        -- 配方主表（扁平列 + JSON 列）
        CREATE TABLE IF NOT EXISTS recipes (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            recipe_type TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            major_group TEXT,
            category TEXT,
            sub_category TEXT,
            station TEXT NOT NULL DEFAULT '',

            storage_area TEXT NOT NULL DEFAULT '',
            container TEXT NOT NULL DEFAULT '',
            container_type TEXT NOT NULL DEFAULT '',
            shelf_life TEXT NOT NULL DEFAULT '',

            prep_time INTEGER NOT NULL DEFAULT 0,
            cook_time INTEGER NOT NULL DEFAULT 0,
            rest_time INTEGER,
            total_time INTEGER NOT NULL DEFAULT 0,

            recipe_unit_ratio TEXT NOT NULL DEFAULT '1',
            unit_type TEXT NOT NULL DEFAULT '',
            yield_amount REAL NOT NULL DEFAULT 1,
            yield_unit TEXT NOT NULL DEFAULT 'portion',
            expected_weight_value REAL,
            expected_weight_unit TEXT,
            portion_size TEXT,

            image_url TEXT,
            video_url TEXT,

            allergen_contains TEXT NOT NULL DEFAULT '[]',
            allergen_may_contain TEXT NOT NULL DEFAULT '[]',
            allergen_cross_contact TEXT NOT NULL DEFAULT '[]',

            labor_cost_per_hour REAL NOT NULL DEFAULT 0,
            ingredient_cost REAL NOT NULL DEFAULT 0,
            total_cost REAL NOT NULL DEFAULT 0,
            cost_per_unit REAL NOT NULL DEFAULT 0,
            cost_per_ratio_unit REAL NOT NULL DEFAULT 0,
            cost_per_serving REAL NOT NULL DEFAULT 0,
            target_cost_percent REAL NOT NULL DEFAULT 0,
            target_price REAL,

            version TEXT NOT NULL DEFAULT '1.0',
            notes TEXT,

            created_at TEXT NOT NULL,
            created_by TEXT NOT NULL DEFAULT '',
            updated_at TEXT NOT NULL,
            modified_by TEXT NOT NULL DEFAULT ''
        );
        CREATE INDEX IF NOT EXISTS idx_recipes_org ON recipes(organization_id);
        CREATE INDEX IF NOT EXISTS idx_recipes_org_type ON recipes(organization_id, recipe_type);

        CREATE TABLE IF NOT EXISTS recipe_ingredients (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            kind TEXT NOT NULL,
            name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            unit_cost REAL NOT NULL,
            notes TEXT,
            prepared_item_id TEXT,
            sort_order INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe
            ON recipe_ingredients(recipe_id);

        CREATE TABLE IF NOT EXISTS recipe_steps (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            step_order INTEGER NOT NULL,
            instruction TEXT NOT NULL,
            notes TEXT,
            warning_level TEXT,
            time_in_minutes INTEGER,
            equipment TEXT NOT NULL DEFAULT '[]',
            quality_checks TEXT NOT NULL DEFAULT '[]',
            media_urls TEXT NOT NULL DEFAULT '[]',
            is_quality_control_point INTEGER NOT NULL DEFAULT 0,
            is_critical_control_point INTEGER NOT NULL DEFAULT 0,
            temperature_value REAL,
            temperature_unit TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_recipe_steps_recipe ON recipe_steps(recipe_id);

        CREATE TABLE IF NOT EXISTS recipe_media (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            kind TEXT NOT NULL,
            url TEXT NOT NULL,
            title TEXT,
            description TEXT,
            timestamp INTEGER,
            step_id TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            is_primary INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_recipe_media_recipe ON recipe_media(recipe_id);

        CREATE TABLE IF NOT EXISTS recipe_equipment (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            station TEXT NOT NULL DEFAULT '',
            is_required INTEGER NOT NULL DEFAULT 0,
            specifications TEXT,
            alternatives TEXT NOT NULL DEFAULT '[]',
            sort_order INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_recipe_equipment_recipe
            ON recipe_equipment(recipe_id);

        CREATE TABLE IF NOT EXISTS recipe_versions (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            version TEXT NOT NULL,
            created_at TEXT NOT NULL,
            created_by TEXT NOT NULL,
            changes TEXT NOT NULL DEFAULT '[]',
            reverted_from TEXT,
            approved_by TEXT,
            approved_at TEXT,
            approved_notes TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_recipe_versions_recipe
            ON recipe_versions(recipe_id);

        -- 质量标准（每配方一行）
        CREATE TABLE IF NOT EXISTS recipe_quality_standards (
            recipe_id TEXT PRIMARY KEY REFERENCES recipes(id) ON DELETE CASCADE,
            appearance_description TEXT NOT NULL DEFAULT '',
            appearance_image_urls TEXT NOT NULL DEFAULT '[]',
            texture TEXT NOT NULL DEFAULT '[]',
            taste TEXT NOT NULL DEFAULT '[]',
            aroma TEXT NOT NULL DEFAULT '[]',
            temperature_value REAL NOT NULL DEFAULT 0,
            temperature_unit TEXT NOT NULL DEFAULT 'F',
            temperature_tolerance REAL NOT NULL DEFAULT 0,
            plating_description TEXT,
            plating_image_url TEXT
        );

        -- 培训要求（每配方一行）
        CREATE TABLE IF NOT EXISTS recipe_training (
            recipe_id TEXT PRIMARY KEY REFERENCES recipes(id) ON DELETE CASCADE,
            required_skill_level TEXT NOT NULL DEFAULT 'beginner',
            certification_required TEXT NOT NULL DEFAULT '[]',
            common_errors TEXT NOT NULL DEFAULT '[]',
            key_techniques TEXT NOT NULL DEFAULT '[]',
            safety_protocols TEXT NOT NULL DEFAULT '[]',
            quality_standards TEXT NOT NULL DEFAULT '[]',
            notes TEXT
        );

        -- 分类层级（大类 → 品类 → 子类）
        CREATE TABLE IF NOT EXISTS major_groups (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            group_id TEXT NOT NULL REFERENCES major_groups(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE IF NOT EXISTS sub_categories (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 操作日志（append-only）
        CREATE TABLE IF NOT EXISTS action_log (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            action_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            operator TEXT NOT NULL,
            detail TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_action_log_org ON action_log(organization_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
