// ==========================================
// 餐饮后厨管理系统 - 媒体 API
// ==========================================
// 职责: 配方媒体上传/删除/主媒体/明细更新
// 红线: 核心只保存存储返回的公开 URL,不感知存储内部
// 说明: 对象删除为尽力而为,记录删除成功即视为操作成功
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::recipe::{Recipe, RecipeMedia};
use crate::domain::types::MediaKind;
use crate::engine::aggregate::RecipeAggregateBuilder;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::recipe_repo::RecipeRepository;
use crate::storage::media_storage_trait::MediaStorage;

// ==========================================
// MediaDetailsPatch - 媒体明细补丁
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDetailsPatch {
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub step_id: Option<Option<String>>,
    pub timestamp: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
}

// ==========================================
// MediaApi - 媒体 API
// ==========================================

/// 媒体 API
///
/// 职责：
/// 1. 上传媒体(对象存储 → URL → 聚合挂载)
/// 2. 删除媒体(记录 + 尽力删除对象)
/// 3. 主媒体切换、明细更新
/// 4. ActionLog 记录
pub struct MediaApi {
    recipe_repo: Arc<RecipeRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    storage: Arc<dyn MediaStorage>,
}

impl MediaApi {
    /// 创建新的 MediaApi 实例
    pub fn new(
        recipe_repo: Arc<RecipeRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        storage: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            recipe_repo,
            action_log_repo,
            storage,
        }
    }

    // ==========================================
    // 上传
    // ==========================================

    /// 上传单个媒体文件并挂载到配方
    ///
    /// # 流程
    /// 1. 对象路径: {org}/recipes/{recipe_id}/{timestamp}_{file_name}
    /// 2. 上传取得公开 URL
    /// 3. 配方首个媒体自动成为主媒体
    pub async fn upload_media(
        &self,
        organization_id: &str,
        recipe_id: &str,
        file_name: &str,
        bytes: &[u8],
        operator: &str,
    ) -> ApiResult<Recipe> {
        info!(organization_id, recipe_id, file_name, "上传配方媒体");
        let mut recipe = self.load_recipe(organization_id, recipe_id)?;

        let timestamp = Utc::now().timestamp_millis();
        let safe_name = sanitize_file_name(file_name);
        let path = format!(
            "{}/recipes/{}/{}_{}",
            organization_id, recipe_id, timestamp, safe_name
        );
        let url = self.storage.upload(&path, bytes).await?;

        let media = RecipeMedia {
            id: format!("media-{}", timestamp),
            kind: MediaKind::from_file_name(&safe_name),
            url,
            title: Some(file_name.to_string()),
            description: None,
            timestamp: None,
            step_id: None,
            tags: Vec::new(),
            is_primary: false,
        };
        let media_id = media.id.clone();
        RecipeAggregateBuilder::add_media(&mut recipe, media);

        self.persist(&mut recipe, operator)?;
        self.log_action(
            organization_id,
            ActionType::UploadMedia,
            recipe_id,
            operator,
            json!({ "media_id": media_id, "file_name": file_name }),
        );
        Ok(recipe)
    }

    /// 并发上传多个媒体文件
    ///
    /// # 说明
    /// - 对象上传并发执行,任一失败则整体失败(已上传对象不回收,仅告警)
    /// - 记录挂载与落库为单次写入
    pub async fn upload_many(
        &self,
        organization_id: &str,
        recipe_id: &str,
        files: Vec<(String, Vec<u8>)>,
        operator: &str,
    ) -> ApiResult<Recipe> {
        info!(organization_id, recipe_id, count = files.len(), "批量上传配方媒体");
        let mut recipe = self.load_recipe(organization_id, recipe_id)?;

        let base_timestamp = Utc::now().timestamp_millis();
        let uploads = files.iter().enumerate().map(|(i, (file_name, bytes))| {
            let timestamp = base_timestamp + i as i64;
            let safe_name = sanitize_file_name(file_name);
            let path = format!(
                "{}/recipes/{}/{}_{}",
                organization_id, recipe_id, timestamp, safe_name
            );
            async move {
                let url = self.storage.upload(&path, bytes).await?;
                Ok::<_, ApiError>((timestamp, safe_name, url))
            }
        });

        let results = join_all(uploads).await;
        for (result, (file_name, _)) in results.into_iter().zip(files.iter()) {
            match result {
                Ok((timestamp, safe_name, url)) => {
                    RecipeAggregateBuilder::add_media(
                        &mut recipe,
                        RecipeMedia {
                            id: format!("media-{}", timestamp),
                            kind: MediaKind::from_file_name(&safe_name),
                            url,
                            title: Some(file_name.clone()),
                            description: None,
                            timestamp: None,
                            step_id: None,
                            tags: Vec::new(),
                            is_primary: false,
                        },
                    );
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(
                        file_name = %file_name,
                        "{}",
                        crate::i18n::t_with_args("media.upload_failed", &[("reason", &reason)])
                    );
                    return Err(e);
                }
            }
        }

        self.persist(&mut recipe, operator)?;
        self.log_action(
            organization_id,
            ActionType::UploadMedia,
            recipe_id,
            operator,
            json!({ "count": files.len() }),
        );
        Ok(recipe)
    }

    // ==========================================
    // 删除与维护
    // ==========================================

    /// 删除媒体记录并尽力删除存储对象
    pub async fn delete_media(
        &self,
        organization_id: &str,
        recipe_id: &str,
        media_id: &str,
        operator: &str,
    ) -> ApiResult<Recipe> {
        info!(organization_id, recipe_id, media_id, "删除配方媒体");
        let mut recipe = self.load_recipe(organization_id, recipe_id)?;

        let removed = RecipeAggregateBuilder::remove_media(&mut recipe, media_id)
            .ok_or_else(|| ApiError::NotFound(format!("RecipeMedia(id={})不存在", media_id)))?;

        // 对象删除尽力而为: 外部 URL(非本存储签发)直接跳过
        if let Some(path) = self.storage.object_path(&removed.url) {
            if let Err(e) = self.storage.delete(&path).await {
                warn!(error = %e, path = %path, "存储对象删除失败,保留记录删除结果");
            }
        }

        self.persist(&mut recipe, operator)?;
        self.log_action(
            organization_id,
            ActionType::DeleteMedia,
            recipe_id,
            operator,
            json!({ "media_id": media_id, "url": removed.url }),
        );
        Ok(recipe)
    }

    /// 设置主媒体(其余媒体主标记清除)
    pub fn set_primary_media(
        &self,
        organization_id: &str,
        recipe_id: &str,
        media_id: &str,
        operator: &str,
    ) -> ApiResult<Recipe> {
        let mut recipe = self.load_recipe(organization_id, recipe_id)?;
        RecipeAggregateBuilder::set_primary_media(&mut recipe, media_id)?;

        self.persist(&mut recipe, operator)?;
        self.log_action(
            organization_id,
            ActionType::SetPrimaryMedia,
            recipe_id,
            operator,
            json!({ "media_id": media_id }),
        );
        Ok(recipe)
    }

    /// 更新媒体明细(一层合并)
    pub fn update_media_details(
        &self,
        organization_id: &str,
        recipe_id: &str,
        media_id: &str,
        patch: &MediaDetailsPatch,
        operator: &str,
    ) -> ApiResult<Recipe> {
        let mut recipe = self.load_recipe(organization_id, recipe_id)?;
        RecipeAggregateBuilder::update_media(&mut recipe, media_id, |media| {
            if let Some(title) = &patch.title {
                media.title = title.clone();
            }
            if let Some(description) = &patch.description {
                media.description = description.clone();
            }
            if let Some(step_id) = &patch.step_id {
                media.step_id = step_id.clone();
            }
            if let Some(timestamp) = patch.timestamp {
                media.timestamp = timestamp;
            }
            if let Some(tags) = &patch.tags {
                media.tags = tags.clone();
            }
        })?;

        self.persist(&mut recipe, operator)?;
        Ok(recipe)
    }

    // ==========================================
    // 内部工具
    // ==========================================

    fn load_recipe(&self, organization_id: &str, recipe_id: &str) -> ApiResult<Recipe> {
        self.recipe_repo
            .find_by_id(organization_id, recipe_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Recipe(id={})不存在", recipe_id)))
    }

    fn persist(&self, recipe: &mut Recipe, operator: &str) -> ApiResult<()> {
        recipe.last_modified = Utc::now();
        recipe.modified_by = operator.to_string();
        self.recipe_repo.update(recipe)?;
        Ok(())
    }

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

/// 去除文件名中的路径片段,防止对象路径逃逸
fn sanitize_file_name(file_name: &str) -> String {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .replace("..", "_");
    if name.is_empty() {
        "unnamed".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_file_name;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("a/b/photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("..\\evil.jpg"), "evil.jpg");
        assert_eq!(sanitize_file_name(""), "unnamed");
    }
}
