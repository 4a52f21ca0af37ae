// ==========================================
// 餐饮后厨管理系统 - 配方子表读写
// ==========================================
// 职责: recipe_ingredients / recipe_steps / recipe_media /
//       recipe_equipment / recipe_versions /
//       recipe_quality_standards / recipe_training 的装载与写入
// 说明: 聚合更新采用"清空子表 + 全量重写",保持与内存聚合一致
// ==========================================

use crate::domain::quality::{
    AppearanceStandard, PlatingInstructions, RecipeQualityStandards, RecipeTraining,
    TemperatureStandard,
};
use crate::domain::recipe::{
    IngredientKind, RecipeEquipment, RecipeIngredient, RecipeMedia, RecipeStep, RecipeVersion,
    TemperatureSpec, VersionApproval,
};
use crate::domain::types::{MediaKind, SkillLevel, TemperatureUnit, WarningLevel};
use crate::repository::error::RepositoryResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// JSON 列序列化（rusqlite 闭包内使用，失败转为列转换错误）
fn to_json_column<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// JSON 列反序列化（闭包内使用）
fn from_json_column<T: DeserializeOwned>(
    idx: usize,
    text: String,
) -> SqliteResult<T> {
    serde_json::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

/// 枚举列解析（闭包内使用）
fn parse_column<T>(idx: usize, text: &str, parse: impl Fn(&str) -> Option<T>) -> SqliteResult<T> {
    parse(text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("无法识别的枚举值: {}", text).into(),
        )
    })
}

fn parse_datetime(text: String) -> DateTime<Utc> {
    text.parse::<DateTime<Utc>>()
        .unwrap_or_else(|_| Utc::now())
}

// ==========================================
// 原料
// ==========================================

pub(super) fn load_ingredients(
    conn: &Connection,
    recipe_id: &str,
) -> RepositoryResult<Vec<RecipeIngredient>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, kind, name, quantity, unit, unit_cost, notes, prepared_item_id
        FROM recipe_ingredients
        WHERE recipe_id = ?1
        ORDER BY sort_order
        "#,
    )?;

    let rows = stmt
        .query_map(params![recipe_id], |row| {
            let kind_text: String = row.get(1)?;
            Ok(RecipeIngredient {
                id: row.get(0)?,
                kind: parse_column(1, &kind_text, IngredientKind::parse)?,
                name: row.get(2)?,
                quantity: row.get(3)?,
                unit: row.get(4)?,
                unit_cost: row.get(5)?,
                notes: row.get(6)?,
                prepared_item_id: row.get(7)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(rows)
}

pub(super) fn insert_ingredients(
    conn: &Connection,
    recipe_id: &str,
    ingredients: &[RecipeIngredient],
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO recipe_ingredients (
            id, recipe_id, kind, name, quantity, unit, unit_cost,
            notes, prepared_item_id, sort_order
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )?;
    for (i, ingredient) in ingredients.iter().enumerate() {
        stmt.execute(params![
            ingredient.id,
            recipe_id,
            ingredient.kind.as_str(),
            ingredient.name,
            ingredient.quantity,
            ingredient.unit,
            ingredient.unit_cost,
            ingredient.notes,
            ingredient.prepared_item_id,
            i as i64,
        ])?;
    }
    Ok(())
}

// ==========================================
// 工序
// ==========================================

pub(super) fn load_steps(
    conn: &Connection,
    recipe_id: &str,
) -> RepositoryResult<Vec<RecipeStep>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, step_order, instruction, notes, warning_level, time_in_minutes,
               equipment, quality_checks, media_urls,
               is_quality_control_point, is_critical_control_point,
               temperature_value, temperature_unit
        FROM recipe_steps
        WHERE recipe_id = ?1
        ORDER BY step_order
        "#,
    )?;

    let rows = stmt
        .query_map(params![recipe_id], |row| {
            let warning_text: Option<String> = row.get(4)?;
            let warning_level = match warning_text {
                Some(text) => Some(parse_column(4, &text, WarningLevel::parse)?),
                None => None,
            };

            let temp_value: Option<f64> = row.get(11)?;
            let temp_unit_text: Option<String> = row.get(12)?;
            let temperature = match (temp_value, temp_unit_text) {
                (Some(value), Some(unit_text)) => Some(TemperatureSpec {
                    value,
                    unit: parse_column(12, &unit_text, TemperatureUnit::parse)?,
                }),
                _ => None,
            };

            Ok(RecipeStep {
                id: row.get(0)?,
                order: row.get::<_, i64>(1)? as u32,
                instruction: row.get(2)?,
                notes: row.get(3)?,
                warning_level,
                time_in_minutes: row.get::<_, Option<i64>>(5)?.map(|v| v as u32),
                equipment: from_json_column(6, row.get(6)?)?,
                quality_checks: from_json_column(7, row.get(7)?)?,
                media_urls: from_json_column(8, row.get(8)?)?,
                is_quality_control_point: row.get(9)?,
                is_critical_control_point: row.get(10)?,
                temperature,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(rows)
}

pub(super) fn insert_steps(
    conn: &Connection,
    recipe_id: &str,
    steps: &[RecipeStep],
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO recipe_steps (
            id, recipe_id, step_order, instruction, notes, warning_level,
            time_in_minutes, equipment, quality_checks, media_urls,
            is_quality_control_point, is_critical_control_point,
            temperature_value, temperature_unit
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )?;
    for step in steps {
        stmt.execute(params![
            step.id,
            recipe_id,
            i64::from(step.order),
            step.instruction,
            step.notes,
            step.warning_level.map(|w| w.as_str()),
            step.time_in_minutes.map(i64::from),
            to_json_column(&step.equipment),
            to_json_column(&step.quality_checks),
            to_json_column(&step.media_urls),
            step.is_quality_control_point,
            step.is_critical_control_point,
            step.temperature.map(|t| t.value),
            step.temperature.map(|t| t.unit.as_str()),
        ])?;
    }
    Ok(())
}

// ==========================================
// 媒体
// ==========================================

pub(super) fn load_media(
    conn: &Connection,
    recipe_id: &str,
) -> RepositoryResult<Vec<RecipeMedia>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, kind, url, title, description, timestamp, step_id, tags, is_primary
        FROM recipe_media
        WHERE recipe_id = ?1
        ORDER BY sort_order
        "#,
    )?;

    let rows = stmt
        .query_map(params![recipe_id], |row| {
            let kind_text: String = row.get(1)?;
            Ok(RecipeMedia {
                id: row.get(0)?,
                kind: parse_column(1, &kind_text, MediaKind::parse)?,
                url: row.get(2)?,
                title: row.get(3)?,
                description: row.get(4)?,
                timestamp: row.get(5)?,
                step_id: row.get(6)?,
                tags: from_json_column(7, row.get(7)?)?,
                is_primary: row.get(8)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(rows)
}

pub(super) fn insert_media(
    conn: &Connection,
    recipe_id: &str,
    media: &[RecipeMedia],
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO recipe_media (
            id, recipe_id, kind, url, title, description, timestamp,
            step_id, tags, is_primary, sort_order
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )?;
    for (i, item) in media.iter().enumerate() {
        stmt.execute(params![
            item.id,
            recipe_id,
            item.kind.as_str(),
            item.url,
            item.title,
            item.description,
            item.timestamp,
            item.step_id,
            to_json_column(&item.tags),
            item.is_primary,
            i as i64,
        ])?;
    }
    Ok(())
}

// ==========================================
// 设备引用
// ==========================================

pub(super) fn load_equipment(
    conn: &Connection,
    recipe_id: &str,
) -> RepositoryResult<Vec<RecipeEquipment>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, name, station, is_required, specifications, alternatives
        FROM recipe_equipment
        WHERE recipe_id = ?1
        ORDER BY sort_order
        "#,
    )?;

    let rows = stmt
        .query_map(params![recipe_id], |row| {
            Ok(RecipeEquipment {
                id: row.get(0)?,
                name: row.get(1)?,
                station: row.get(2)?,
                is_required: row.get(3)?,
                specifications: row.get(4)?,
                alternatives: from_json_column(5, row.get(5)?)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(rows)
}

pub(super) fn insert_equipment(
    conn: &Connection,
    recipe_id: &str,
    equipment: &[RecipeEquipment],
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO recipe_equipment (
            id, recipe_id, name, station, is_required, specifications,
            alternatives, sort_order
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )?;
    for (i, item) in equipment.iter().enumerate() {
        stmt.execute(params![
            item.id,
            recipe_id,
            item.name,
            item.station,
            item.is_required,
            item.specifications,
            to_json_column(&item.alternatives),
            i as i64,
        ])?;
    }
    Ok(())
}

// ==========================================
// 版本记录
// ==========================================

pub(super) fn load_versions(
    conn: &Connection,
    recipe_id: &str,
) -> RepositoryResult<Vec<RecipeVersion>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, version, created_at, created_by, changes, reverted_from,
               approved_by, approved_at, approved_notes
        FROM recipe_versions
        WHERE recipe_id = ?1
        ORDER BY created_at
        "#,
    )?;

    let rows = stmt
        .query_map(params![recipe_id], |row| {
            let approved_by: Option<String> = row.get(6)?;
            let approved_at: Option<String> = row.get(7)?;
            let approved = match (approved_by, approved_at) {
                (Some(by), Some(at)) => Some(VersionApproval {
                    by,
                    at: parse_datetime(at),
                    notes: row.get(8)?,
                }),
                _ => None,
            };

            Ok(RecipeVersion {
                id: row.get(0)?,
                version: row.get(1)?,
                created_at: parse_datetime(row.get(2)?),
                created_by: row.get(3)?,
                changes: from_json_column(4, row.get(4)?)?,
                reverted_from: row.get(5)?,
                approved,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()?;
    Ok(rows)
}

pub(super) fn insert_versions(
    conn: &Connection,
    recipe_id: &str,
    versions: &[RecipeVersion],
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO recipe_versions (
            id, recipe_id, version, created_at, created_by, changes,
            reverted_from, approved_by, approved_at, approved_notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )?;
    for version in versions {
        stmt.execute(params![
            version.id,
            recipe_id,
            version.version,
            version.created_at.to_rfc3339(),
            version.created_by,
            to_json_column(&version.changes),
            version.reverted_from,
            version.approved.as_ref().map(|a| a.by.clone()),
            version.approved.as_ref().map(|a| a.at.to_rfc3339()),
            version.approved.as_ref().and_then(|a| a.notes.clone()),
        ])?;
    }
    Ok(())
}

// ==========================================
// 质量标准(每配方一行)
// ==========================================

pub(super) fn load_quality_standards(
    conn: &Connection,
    recipe_id: &str,
) -> RepositoryResult<RecipeQualityStandards> {
    let mut stmt = conn.prepare(
        r#"
        SELECT appearance_description, appearance_image_urls, texture, taste, aroma,
               temperature_value, temperature_unit, temperature_tolerance,
               plating_description, plating_image_url
        FROM recipe_quality_standards
        WHERE recipe_id = ?1
        "#,
    )?;

    let result = stmt.query_row(params![recipe_id], |row| {
        let unit_text: String = row.get(6)?;
        let plating_description: Option<String> = row.get(8)?;
        Ok(RecipeQualityStandards {
            appearance: AppearanceStandard {
                description: row.get(0)?,
                image_urls: from_json_column(1, row.get(1)?)?,
            },
            texture: from_json_column(2, row.get(2)?)?,
            taste: from_json_column(3, row.get(3)?)?,
            aroma: from_json_column(4, row.get(4)?)?,
            temperature: TemperatureStandard {
                value: row.get(5)?,
                unit: parse_column(6, &unit_text, TemperatureUnit::parse)?,
                tolerance: row.get(7)?,
            },
            plating_instructions: plating_description.map(|description| PlatingInstructions {
                description,
                image_url: row.get(9).ok().flatten(),
            }),
        })
    });

    match result {
        Ok(quality) => Ok(quality),
        // 缺行按默认质量标准处理(与前端空表单一致)
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(RecipeQualityStandards::default()),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn upsert_quality_standards(
    conn: &Connection,
    recipe_id: &str,
    quality: &RecipeQualityStandards,
) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO recipe_quality_standards (
            recipe_id, appearance_description, appearance_image_urls,
            texture, taste, aroma,
            temperature_value, temperature_unit, temperature_tolerance,
            plating_description, plating_image_url
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            recipe_id,
            quality.appearance.description,
            to_json_column(&quality.appearance.image_urls),
            to_json_column(&quality.texture),
            to_json_column(&quality.taste),
            to_json_column(&quality.aroma),
            quality.temperature.value,
            quality.temperature.unit.as_str(),
            quality.temperature.tolerance,
            quality.plating_instructions.as_ref().map(|p| p.description.clone()),
            quality
                .plating_instructions
                .as_ref()
                .and_then(|p| p.image_url.clone()),
        ],
    )?;
    Ok(())
}

// ==========================================
// 培训要求(每配方一行)
// ==========================================

pub(super) fn load_training(
    conn: &Connection,
    recipe_id: &str,
) -> RepositoryResult<RecipeTraining> {
    let mut stmt = conn.prepare(
        r#"
        SELECT required_skill_level, certification_required, common_errors,
               key_techniques, safety_protocols, quality_standards, notes
        FROM recipe_training
        WHERE recipe_id = ?1
        "#,
    )?;

    let result = stmt.query_row(params![recipe_id], |row| {
        let level_text: String = row.get(0)?;
        Ok(RecipeTraining {
            required_skill_level: parse_column(0, &level_text, SkillLevel::parse)?,
            certification_required: from_json_column(1, row.get(1)?)?,
            common_errors: from_json_column(2, row.get(2)?)?,
            key_techniques: from_json_column(3, row.get(3)?)?,
            safety_protocols: from_json_column(4, row.get(4)?)?,
            quality_standards: from_json_column(5, row.get(5)?)?,
            notes: row.get(6)?,
        })
    });

    match result {
        Ok(training) => Ok(training),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(RecipeTraining::default()),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn upsert_training(
    conn: &Connection,
    recipe_id: &str,
    training: &RecipeTraining,
) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO recipe_training (
            recipe_id, required_skill_level, certification_required,
            common_errors, key_techniques, safety_protocols,
            quality_standards, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            recipe_id,
            training.required_skill_level.as_str(),
            to_json_column(&training.certification_required),
            to_json_column(&training.common_errors),
            to_json_column(&training.key_techniques),
            to_json_column(&training.safety_protocols),
            to_json_column(&training.quality_standards),
            training.notes,
        ],
    )?;
    Ok(())
}

// ==========================================
// 子表清空(聚合更新前)
// ==========================================

pub(super) fn clear_children(conn: &Connection, recipe_id: &str) -> RepositoryResult<()> {
    for table in [
        "recipe_ingredients",
        "recipe_steps",
        "recipe_media",
        "recipe_equipment",
        "recipe_versions",
        "recipe_quality_standards",
        "recipe_training",
    ] {
        conn.execute(
            &format!("DELETE FROM {} WHERE recipe_id = ?1", table),
            params![recipe_id],
        )?;
    }
    Ok(())
}
