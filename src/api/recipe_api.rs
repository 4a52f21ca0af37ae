// ==========================================
// 餐饮后厨管理系统 - 配方 API
// ==========================================
// 职责: 配方查询、创建、补丁更新、删除、版本管理
// 红线: 更新必须经聚合合并器走完整合并 + 成本重算,
//       禁止把部分更新直接写库导致派生字段过期
// 红线: 所有写入操作记录 ActionLog
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::RecipeValidator;
use crate::config::config_manager::ConfigManager;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::patch::RecipePatch;
use crate::domain::recipe::{Recipe, RecipeVersion, VersionApproval};
use crate::domain::types::RecipeType;
use crate::engine::aggregate::RecipeAggregateBuilder;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::recipe_repo::RecipeRepository;

// ==========================================
// RecipeApi - 配方 API
// ==========================================

/// 配方 API
///
/// 职责：
/// 1. 配方查询与过滤
/// 2. 创建/补丁更新/删除（含成本同步与审计戳）
/// 3. 版本保存与审批
/// 4. ActionLog 记录
pub struct RecipeApi {
    recipe_repo: Arc<RecipeRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigManager>,
}

impl RecipeApi {
    /// 创建新的 RecipeApi 实例
    pub fn new(
        recipe_repo: Arc<RecipeRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            recipe_repo,
            action_log_repo,
            config,
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询组织下全部配方(按名称排序)
    pub fn list_recipes(&self, organization_id: &str) -> ApiResult<Vec<Recipe>> {
        debug!(organization_id, "查询配方列表");
        Ok(self.recipe_repo.list_by_organization(organization_id)?)
    }

    /// 按 id 查询配方
    pub fn get_recipe(&self, organization_id: &str, recipe_id: &str) -> ApiResult<Recipe> {
        self.recipe_repo
            .find_by_id(organization_id, recipe_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Recipe(id={})不存在", recipe_id)))
    }

    /// 按类型 + 关键词过滤配方
    ///
    /// # 规则
    /// - 类型精确匹配
    /// - 关键词对 名称/描述/工位 做大小写不敏感的子串匹配
    /// - 空关键词只按类型过滤
    pub fn filter_recipes(
        &self,
        organization_id: &str,
        recipe_type: RecipeType,
        search_term: &str,
    ) -> ApiResult<Vec<Recipe>> {
        let needle = search_term.trim().to_lowercase();
        let recipes = self.recipe_repo.list_by_organization(organization_id)?;
        Ok(recipes
            .into_iter()
            .filter(|r| r.recipe_type == recipe_type)
            .filter(|r| {
                if needle.is_empty() {
                    return true;
                }
                r.name.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
                    || r.station.to_lowercase().contains(&needle)
            })
            .collect())
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 创建配方
    ///
    /// # 流程
    /// 1. 归属组织、补默认时薪(配置)
    /// 2. 校验
    /// 3. 成本重算(完整快照)
    /// 4. 审计戳 + 落库 + ActionLog
    pub fn create_recipe(
        &self,
        organization_id: &str,
        mut recipe: Recipe,
        operator: &str,
    ) -> ApiResult<Recipe> {
        info!(organization_id, name = %recipe.name, "创建配方");

        recipe.organization_id = organization_id.to_string();
        if recipe.labor_cost_per_hour == 0.0 {
            recipe.labor_cost_per_hour = self
                .config
                .get_default_labor_cost_per_hour()
                .map_err(|e| ApiError::InternalError(e.to_string()))?;
        }
        if recipe.target_cost_percent == 0.0 {
            recipe.target_cost_percent = self
                .config
                .get_default_target_cost_percent()
                .map_err(|e| ApiError::InternalError(e.to_string()))?;
        }

        RecipeValidator::validate(&recipe)?;
        RecipeAggregateBuilder::recompute_costs(&mut recipe)?;

        let now = Utc::now();
        recipe.created_at = now;
        recipe.created_by = operator.to_string();
        recipe.last_modified = now;
        recipe.modified_by = operator.to_string();
        if recipe.version.is_empty() {
            recipe.version = "1.0".to_string();
        }

        self.recipe_repo.insert(&recipe)?;
        self.log_action(
            organization_id,
            ActionType::CreateRecipe,
            &recipe.id,
            operator,
            json!({ "name": recipe.name }),
        );
        info!(recipe_id = %recipe.id, "{}", crate::i18n::t("recipe.created"));
        Ok(recipe)
    }

    /// 补丁更新配方
    ///
    /// # 流程
    /// 1. 装载当前聚合
    /// 2. 聚合合并器合并补丁(级联清空 + 派生字段同步)
    /// 3. 校验 + 审计戳
    /// 4. 落库 + ActionLog
    ///
    /// # 失败语义
    /// 落库失败时不回滚调用方内存状态,由调用方决定是否重载
    pub fn update_recipe(
        &self,
        organization_id: &str,
        recipe_id: &str,
        patch: &RecipePatch,
        operator: &str,
    ) -> ApiResult<Recipe> {
        info!(organization_id, recipe_id, "更新配方");

        let current = self.get_recipe(organization_id, recipe_id)?;
        let mut next = RecipeAggregateBuilder::apply_patch(&current, patch)?;

        RecipeValidator::validate(&next)?;
        next.last_modified = Utc::now();
        next.modified_by = operator.to_string();

        self.recipe_repo.update(&next)?;
        self.log_action(
            organization_id,
            ActionType::UpdateRecipe,
            recipe_id,
            operator,
            json!({ "name": next.name }),
        );
        info!(recipe_id, "{}", crate::i18n::t("recipe.updated"));
        Ok(next)
    }

    /// 删除配方(子记录级联删除)
    pub fn delete_recipe(
        &self,
        organization_id: &str,
        recipe_id: &str,
        operator: &str,
    ) -> ApiResult<()> {
        info!(organization_id, recipe_id, "删除配方");
        self.recipe_repo.delete(organization_id, recipe_id)?;
        self.log_action(
            organization_id,
            ActionType::DeleteRecipe,
            recipe_id,
            operator,
            json!({}),
        );
        info!(recipe_id, "{}", crate::i18n::t("recipe.deleted"));
        Ok(())
    }

    // ==========================================
    // 版本管理
    // ==========================================

    /// 保存新版本(版本号自增,历史追加)
    pub fn save_version(
        &self,
        organization_id: &str,
        recipe_id: &str,
        changes: Vec<String>,
        operator: &str,
    ) -> ApiResult<Recipe> {
        let mut recipe = self.get_recipe(organization_id, recipe_id)?;
        let next_version = bump_version(&recipe.version);
        info!(recipe_id, from = %recipe.version, to = %next_version, "保存配方版本");

        recipe.versions.push(RecipeVersion {
            id: Uuid::new_v4().to_string(),
            version: next_version.clone(),
            created_at: Utc::now(),
            created_by: operator.to_string(),
            changes: changes.clone(),
            reverted_from: None,
            approved: None,
        });
        recipe.version = next_version;
        recipe.last_modified = Utc::now();
        recipe.modified_by = operator.to_string();

        self.recipe_repo.update(&recipe)?;
        self.log_action(
            organization_id,
            ActionType::SaveVersion,
            recipe_id,
            operator,
            json!({ "version": recipe.version, "changes": changes }),
        );
        Ok(recipe)
    }

    /// 审批版本
    pub fn approve_version(
        &self,
        organization_id: &str,
        recipe_id: &str,
        version_id: &str,
        approver: &str,
        notes: Option<String>,
    ) -> ApiResult<Recipe> {
        let mut recipe = self.get_recipe(organization_id, recipe_id)?;
        let version = recipe
            .versions
            .iter_mut()
            .find(|v| v.id == version_id)
            .ok_or_else(|| {
                ApiError::NotFound(format!("RecipeVersion(id={})不存在", version_id))
            })?;

        version.approved = Some(VersionApproval {
            by: approver.to_string(),
            at: Utc::now(),
            notes,
        });
        recipe.last_modified = Utc::now();
        recipe.modified_by = approver.to_string();

        self.recipe_repo.update(&recipe)?;
        self.log_action(
            organization_id,
            ActionType::ApproveVersion,
            recipe_id,
            approver,
            json!({ "version_id": version_id }),
        );
        Ok(recipe)
    }

    // ==========================================
    // 内部工具
    // ==========================================

    /// 写 ActionLog(失败只告警,不阻断主流程)
    fn log_action(
        &self,
        organization_id: &str,
        action_type: ActionType,
        entity_id: &str,
        operator: &str,
        detail: serde_json::Value,
    ) {
        let log = ActionLog::new(organization_id, action_type, entity_id, operator, Some(detail));
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "ActionLog 写入失败");
        }
    }
}

/// 版本号自增: "major.minor" → minor+1;无法解析时从 1.1 开始
fn bump_version(version: &str) -> String {
    let mut parts = version.split('.');
    let major = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    let minor = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);
    format!("{}.{}", major, minor + 1)
}

#[cfg(test)]
mod tests {
    use super::bump_version;

    #[test]
    fn test_bump_version() {
        assert_eq!(bump_version("1.0"), "1.1");
        assert_eq!(bump_version("2.9"), "2.10");
        assert_eq!(bump_version("3"), "3.1");
        assert_eq!(bump_version("草稿"), "1.1");
    }
}
