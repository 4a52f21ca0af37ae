// ==========================================
// 餐饮后厨管理系统 - 配方聚合仓储实现
// ==========================================
// 职责: 管理 recipes 主表与全部子表的组织隔离 CRUD
// 红线: 不含业务逻辑,只负责数据访问
// ==========================================

use super::children;
use crate::db::open_sqlite_connection;
use crate::domain::allergen::AllergenInfo;
use crate::domain::recipe::{ExpectedWeight, Recipe, RecipeYield};
use crate::domain::types::{RecipeType, WeightUnit, YieldUnit};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const RECIPE_COLUMNS: &str = r#"
    id, organization_id, recipe_type, name, description,
    major_group, category, sub_category, station,
    storage_area, container, container_type, shelf_life,
    prep_time, cook_time, rest_time, total_time,
    recipe_unit_ratio, unit_type, yield_amount, yield_unit,
    expected_weight_value, expected_weight_unit, portion_size,
    image_url, video_url,
    allergen_contains, allergen_may_contain, allergen_cross_contact,
    labor_cost_per_hour, ingredient_cost, total_cost, cost_per_unit,
    cost_per_ratio_unit, cost_per_serving, target_cost_percent, target_price,
    version, notes,
    created_at, created_by, updated_at, modified_by
"#;

// ==========================================
// RecipeRepository - 配方聚合仓储
// ==========================================
/// 配方聚合仓储
/// 职责: recipes 及子表的组织隔离 CRUD
/// 红线: 所有查询/写入必须带 organization_id 过滤
pub struct RecipeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RecipeRepository {
    /// 创建新的 RecipeRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询组织下全部配方聚合(按名称排序)
    pub fn list_by_organization(&self, organization_id: &str) -> RepositoryResult<Vec<Recipe>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM recipes WHERE organization_id = ?1 ORDER BY name",
            RECIPE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut recipes = stmt
            .query_map(params![organization_id], map_recipe_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        drop(stmt);

        for recipe in &mut recipes {
            load_children(&conn, recipe)?;
        }
        Ok(recipes)
    }

    /// 按 id + 组织查询单个配方聚合
    pub fn find_by_id(
        &self,
        organization_id: &str,
        recipe_id: &str,
    ) -> RepositoryResult<Option<Recipe>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM recipes WHERE id = ?1 AND organization_id = ?2",
            RECIPE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let result = stmt.query_row(params![recipe_id, organization_id], map_recipe_row);

        match result {
            Ok(mut recipe) => {
                drop(stmt);
                load_children(&conn, &mut recipe)?;
                Ok(Some(recipe))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 插入完整配方聚合(事务)
    pub fn insert(&self, recipe: &Recipe) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO recipes (
                id, organization_id, recipe_type, name, description,
                major_group, category, sub_category, station,
                storage_area, container, container_type, shelf_life,
                prep_time, cook_time, rest_time, total_time,
                recipe_unit_ratio, unit_type, yield_amount, yield_unit,
                expected_weight_value, expected_weight_unit, portion_size,
                image_url, video_url,
                allergen_contains, allergen_may_contain, allergen_cross_contact,
                labor_cost_per_hour, ingredient_cost, total_cost, cost_per_unit,
                cost_per_ratio_unit, cost_per_serving, target_cost_percent, target_price,
                version, notes,
                created_at, created_by, updated_at, modified_by
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
                ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
                ?31, ?32, ?33, ?34, ?35, ?36, ?37, ?38, ?39, ?40,
                ?41, ?42, ?43
            )
            "#,
            rusqlite::params_from_iter(recipe_row_params(recipe)?),
        )?;

        write_children(&tx, recipe)?;
        tx.commit()?;
        Ok(())
    }

    /// 更新完整配方聚合(事务,子表全量重写)
    pub fn update(&self, recipe: &Recipe) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let affected = tx.execute(
            r#"
            UPDATE recipes SET
                recipe_type = ?3, name = ?4, description = ?5,
                major_group = ?6, category = ?7, sub_category = ?8, station = ?9,
                storage_area = ?10, container = ?11, container_type = ?12, shelf_life = ?13,
                prep_time = ?14, cook_time = ?15, rest_time = ?16, total_time = ?17,
                recipe_unit_ratio = ?18, unit_type = ?19, yield_amount = ?20, yield_unit = ?21,
                expected_weight_value = ?22, expected_weight_unit = ?23, portion_size = ?24,
                image_url = ?25, video_url = ?26,
                allergen_contains = ?27, allergen_may_contain = ?28, allergen_cross_contact = ?29,
                labor_cost_per_hour = ?30, ingredient_cost = ?31, total_cost = ?32,
                cost_per_unit = ?33, cost_per_ratio_unit = ?34, cost_per_serving = ?35,
                target_cost_percent = ?36, target_price = ?37,
                version = ?38, notes = ?39,
                created_at = ?40, created_by = ?41, updated_at = ?42, modified_by = ?43
            WHERE id = ?1 AND organization_id = ?2
            "#,
            rusqlite::params_from_iter(recipe_row_params(recipe)?),
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Recipe", &recipe.id));
        }

        children::clear_children(&tx, &recipe.id)?;
        write_children(&tx, recipe)?;
        tx.commit()?;
        Ok(())
    }

    /// 按 id + 组织删除配方(子表级联删除)
    pub fn delete(&self, organization_id: &str, recipe_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM recipes WHERE id = ?1 AND organization_id = ?2",
            params![recipe_id, organization_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Recipe", recipe_id));
        }
        Ok(())
    }
}

// ==========================================
// 行映射与参数展开
// ==========================================

fn map_recipe_row(row: &Row<'_>) -> SqliteResult<Recipe> {
    let recipe_type_text: String = row.get(2)?;
    let recipe_type = RecipeType::parse(&recipe_type_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("无法识别的配方类型: {}", recipe_type_text).into(),
        )
    })?;

    let yield_unit_text: String = row.get(20)?;
    let yield_unit = YieldUnit::parse(&yield_unit_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            20,
            rusqlite::types::Type::Text,
            format!("无法识别的产量单位: {}", yield_unit_text).into(),
        )
    })?;

    let expected_weight_value: Option<f64> = row.get(21)?;
    let expected_weight_unit: Option<String> = row.get(22)?;
    let expected_weight = match (expected_weight_value, expected_weight_unit) {
        (Some(value), Some(unit_text)) => {
            let unit = WeightUnit::parse(&unit_text).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    22,
                    rusqlite::types::Type::Text,
                    format!("无法识别的重量单位: {}", unit_text).into(),
                )
            })?;
            Some(ExpectedWeight { value, unit })
        }
        _ => None,
    };

    let parse_allergens = |idx: usize, text: String| {
        serde_json::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
    };

    let allergen_info = AllergenInfo {
        contains: parse_allergens(26, row.get(26)?)?,
        may_contain: parse_allergens(27, row.get(27)?)?,
        cross_contact_risk: parse_allergens(28, row.get(28)?)?,
    };

    let parse_datetime = |text: String| {
        text.parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now())
    };

    Ok(Recipe {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        recipe_type,
        name: row.get(3)?,
        description: row.get(4)?,
        major_group: row.get(5)?,
        category: row.get(6)?,
        sub_category: row.get(7)?,
        station: row.get(8)?,
        storage_area: row.get(9)?,
        container: row.get(10)?,
        container_type: row.get(11)?,
        shelf_life: row.get(12)?,
        prep_time: row.get::<_, i64>(13)? as u32,
        cook_time: row.get::<_, i64>(14)? as u32,
        rest_time: row.get::<_, Option<i64>>(15)?.map(|v| v as u32),
        total_time: row.get::<_, i64>(16)? as u32,
        recipe_unit_ratio: row.get(17)?,
        unit_type: row.get(18)?,
        yield_info: RecipeYield {
            amount: row.get(19)?,
            unit: yield_unit,
            expected_weight,
            portion_size: row.get(23)?,
        },
        ingredients: Vec::new(),
        steps: Vec::new(),
        image_url: row.get(24)?,
        video_url: row.get(25)?,
        media: Vec::new(),
        allergen_info,
        quality_standards: Default::default(),
        training: Default::default(),
        equipment: Vec::new(),
        labor_cost_per_hour: row.get(29)?,
        ingredient_cost: row.get(30)?,
        total_cost: row.get(31)?,
        cost_per_unit: row.get(32)?,
        cost_per_ratio_unit: row.get(33)?,
        cost_per_serving: row.get(34)?,
        target_cost_percent: row.get(35)?,
        target_price: row.get(36)?,
        version: row.get(37)?,
        versions: Vec::new(),
        notes: row.get(38)?,
        created_at: parse_datetime(row.get(39)?),
        created_by: row.get(40)?,
        last_modified: parse_datetime(row.get(41)?),
        modified_by: row.get(42)?,
    })
}

fn recipe_row_params(recipe: &Recipe) -> RepositoryResult<Vec<Box<dyn rusqlite::ToSql>>> {
    let allergen_json = |field: &str, value: &std::collections::BTreeSet<crate::domain::allergen::Allergen>| {
        serde_json::to_string(value)
            .map_err(|e| RepositoryError::field_value(field, e.to_string()))
    };

    Ok(vec![
        Box::new(recipe.id.clone()),
        Box::new(recipe.organization_id.clone()),
        Box::new(recipe.recipe_type.as_str()),
        Box::new(recipe.name.clone()),
        Box::new(recipe.description.clone()),
        Box::new(recipe.major_group.clone()),
        Box::new(recipe.category.clone()),
        Box::new(recipe.sub_category.clone()),
        Box::new(recipe.station.clone()),
        Box::new(recipe.storage_area.clone()),
        Box::new(recipe.container.clone()),
        Box::new(recipe.container_type.clone()),
        Box::new(recipe.shelf_life.clone()),
        Box::new(i64::from(recipe.prep_time)),
        Box::new(i64::from(recipe.cook_time)),
        Box::new(recipe.rest_time.map(i64::from)),
        Box::new(i64::from(recipe.total_time)),
        Box::new(recipe.recipe_unit_ratio.clone()),
        Box::new(recipe.unit_type.clone()),
        Box::new(recipe.yield_info.amount),
        Box::new(recipe.yield_info.unit.as_str()),
        Box::new(recipe.yield_info.expected_weight.map(|w| w.value)),
        Box::new(recipe.yield_info.expected_weight.map(|w| w.unit.as_str())),
        Box::new(recipe.yield_info.portion_size.clone()),
        Box::new(recipe.image_url.clone()),
        Box::new(recipe.video_url.clone()),
        Box::new(allergen_json("allergen_contains", &recipe.allergen_info.contains)?),
        Box::new(allergen_json("allergen_may_contain", &recipe.allergen_info.may_contain)?),
        Box::new(allergen_json(
            "allergen_cross_contact",
            &recipe.allergen_info.cross_contact_risk,
        )?),
        Box::new(recipe.labor_cost_per_hour),
        Box::new(recipe.ingredient_cost),
        Box::new(recipe.total_cost),
        Box::new(recipe.cost_per_unit),
        Box::new(recipe.cost_per_ratio_unit),
        Box::new(recipe.cost_per_serving),
        Box::new(recipe.target_cost_percent),
        Box::new(recipe.target_price),
        Box::new(recipe.version.clone()),
        Box::new(recipe.notes.clone()),
        Box::new(recipe.created_at.to_rfc3339()),
        Box::new(recipe.created_by.clone()),
        Box::new(recipe.last_modified.to_rfc3339()),
        Box::new(recipe.modified_by.clone()),
    ])
}

fn load_children(conn: &Connection, recipe: &mut Recipe) -> RepositoryResult<()> {
    recipe.ingredients = children::load_ingredients(conn, &recipe.id)?;
    recipe.steps = children::load_steps(conn, &recipe.id)?;
    recipe.media = children::load_media(conn, &recipe.id)?;
    recipe.equipment = children::load_equipment(conn, &recipe.id)?;
    recipe.versions = children::load_versions(conn, &recipe.id)?;
    recipe.quality_standards = children::load_quality_standards(conn, &recipe.id)?;
    recipe.training = children::load_training(conn, &recipe.id)?;
    Ok(())
}

fn write_children(conn: &Connection, recipe: &Recipe) -> RepositoryResult<()> {
    children::insert_ingredients(conn, &recipe.id, &recipe.ingredients)?;
    children::insert_steps(conn, &recipe.id, &recipe.steps)?;
    children::insert_media(conn, &recipe.id, &recipe.media)?;
    children::insert_equipment(conn, &recipe.id, &recipe.equipment)?;
    children::insert_versions(conn, &recipe.id, &recipe.versions)?;
    children::upsert_quality_standards(conn, &recipe.id, &recipe.quality_standards)?;
    children::upsert_training(conn, &recipe.id, &recipe.training)?;
    Ok(())
}
