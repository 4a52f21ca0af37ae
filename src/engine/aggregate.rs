// ==========================================
// 餐饮后厨管理系统 - 配方聚合合并器
// ==========================================
// 职责: 类型化补丁合并 + 派生字段同步 + 工序/媒体列表操作
// 红线: 成本重算必须基于"完整合并后"的配方快照,
//       禁止在中间态上触发计算
// 红线: 工序 order 在任何增删移后保持从 1 开始连续
// ==========================================

use crate::domain::patch::RecipePatch;
use crate::domain::recipe::{Recipe, RecipeMedia, RecipeStep};
use crate::engine::classification::ClassificationResolver;
use crate::engine::cost::CostEngine;
use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// MoveDirection - 工序移动方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

pub struct RecipeAggregateBuilder;

impl RecipeAggregateBuilder {
    // ==========================================
    // 补丁合并
    // ==========================================

    /// 合并补丁并同步派生字段
    ///
    /// # 合并规则
    /// - 顶层字段浅合并(Some 覆盖)
    /// - yield/storage/quality_standards 深一层合并
    /// - 列表字段整体替换(steps 替换后重排 order)
    /// - 分类路径按级联规则清空子级
    ///
    /// # 派生同步
    /// - total_time 在任何时间字段变更后重算
    /// - 成本字段在补丁触及成本相关字段时重算(基于合并后的快照)
    pub fn apply_patch(recipe: &Recipe, patch: &RecipePatch) -> EngineResult<Recipe> {
        let mut next = recipe.clone();

        Self::merge_classification(&mut next, patch);
        Self::merge_scalars(&mut next, patch);
        Self::merge_nested(&mut next, patch);
        Self::merge_lists(&mut next, patch);

        // total_time 恒为 prep + cook + rest 的派生值
        next.total_time = CostEngine::total_time(next.prep_time, next.cook_time, next.rest_time);

        // 成本重算观察的是完整合并后的状态
        if Self::touches_cost(patch) {
            Self::recompute_costs(&mut next)?;
        }

        Ok(next)
    }

    /// 重算成本派生字段(写回配方)
    pub fn recompute_costs(recipe: &mut Recipe) -> EngineResult<()> {
        let costs = CostEngine::calculate(recipe)?;
        recipe.ingredient_cost = costs.ingredient_cost;
        recipe.total_cost = costs.total_cost;
        recipe.cost_per_unit = costs.cost_per_unit;
        recipe.cost_per_ratio_unit = costs.cost_per_ratio_unit;
        recipe.cost_per_serving = costs.cost_per_serving;
        Ok(())
    }

    /// 补丁是否触及成本相关字段
    fn touches_cost(patch: &RecipePatch) -> bool {
        patch.ingredients.is_some()
            || patch.prep_time.is_some()
            || patch.cook_time.is_some()
            || patch.labor_cost_per_hour.is_some()
            || patch.recipe_unit_ratio.is_some()
            || patch
                .yield_patch
                .as_ref()
                .map(|y| y.amount.is_some())
                .unwrap_or(false)
    }

    fn merge_classification(next: &mut Recipe, patch: &RecipePatch) {
        let old_group = next.major_group.clone();
        if let Some(group) = &patch.major_group {
            next.major_group = group.clone();
        }
        let (category, sub_category) = ClassificationResolver::cascade_on_group_change(
            old_group.as_deref(),
            next.major_group.as_deref(),
            next.category.take(),
            next.sub_category.take(),
        );
        next.category = category;
        next.sub_category = sub_category;

        let old_category = next.category.clone();
        if let Some(category) = &patch.category {
            next.category = category.clone();
        }
        next.sub_category = ClassificationResolver::cascade_on_category_change(
            old_category.as_deref(),
            next.category.as_deref(),
            next.sub_category.take(),
        );

        if let Some(sub_category) = &patch.sub_category {
            next.sub_category = sub_category.clone();
        }
    }

    fn merge_scalars(next: &mut Recipe, patch: &RecipePatch) {
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(recipe_type) = patch.recipe_type {
            next.recipe_type = recipe_type;
        }
        if let Some(station) = &patch.station {
            next.station = station.clone();
        }
        if let Some(notes) = &patch.notes {
            next.notes = notes.clone();
        }
        if let Some(prep_time) = patch.prep_time {
            next.prep_time = prep_time;
        }
        if let Some(cook_time) = patch.cook_time {
            next.cook_time = cook_time;
        }
        if let Some(rest_time) = patch.rest_time {
            next.rest_time = rest_time;
        }
        if let Some(ratio) = &patch.recipe_unit_ratio {
            next.recipe_unit_ratio = ratio.clone();
        }
        if let Some(unit_type) = &patch.unit_type {
            next.unit_type = unit_type.clone();
        }
        if let Some(image_url) = &patch.image_url {
            next.image_url = image_url.clone();
        }
        if let Some(video_url) = &patch.video_url {
            next.video_url = video_url.clone();
        }
        if let Some(rate) = patch.labor_cost_per_hour {
            next.labor_cost_per_hour = rate;
        }
        if let Some(percent) = patch.target_cost_percent {
            next.target_cost_percent = percent;
        }
        if let Some(price) = patch.target_price {
            next.target_price = price;
        }
    }

    fn merge_nested(next: &mut Recipe, patch: &RecipePatch) {
        if let Some(storage) = &patch.storage {
            if let Some(area) = &storage.storage_area {
                next.storage_area = area.clone();
            }
            if let Some(container) = &storage.container {
                next.container = container.clone();
            }
            if let Some(container_type) = &storage.container_type {
                next.container_type = container_type.clone();
            }
            if let Some(shelf_life) = &storage.shelf_life {
                next.shelf_life = shelf_life.clone();
            }
        }

        if let Some(yield_patch) = &patch.yield_patch {
            if let Some(amount) = yield_patch.amount {
                next.yield_info.amount = amount;
            }
            if let Some(unit) = yield_patch.unit {
                next.yield_info.unit = unit;
            }
            if let Some(expected_weight) = yield_patch.expected_weight {
                next.yield_info.expected_weight = expected_weight;
            }
            if let Some(portion_size) = &yield_patch.portion_size {
                next.yield_info.portion_size = portion_size.clone();
            }
        }

        if let Some(quality) = &patch.quality_standards {
            if let Some(appearance) = &quality.appearance {
                next.quality_standards.appearance = appearance.clone();
            }
            if let Some(texture) = &quality.texture {
                next.quality_standards.texture = texture.clone();
            }
            if let Some(taste) = &quality.taste {
                next.quality_standards.taste = taste.clone();
            }
            if let Some(aroma) = &quality.aroma {
                next.quality_standards.aroma = aroma.clone();
            }
            if let Some(temperature) = &quality.temperature {
                next.quality_standards.temperature = temperature.clone();
            }
            if let Some(plating) = &quality.plating_instructions {
                next.quality_standards.plating_instructions = plating.clone();
            }
        }

        if let Some(training) = &patch.training {
            next.training = training.clone();
        }
        if let Some(allergen_info) = &patch.allergen_info {
            next.allergen_info = allergen_info.clone();
        }
    }

    fn merge_lists(next: &mut Recipe, patch: &RecipePatch) {
        if let Some(ingredients) = &patch.ingredients {
            next.ingredients = ingredients.clone();
        }
        if let Some(steps) = &patch.steps {
            next.steps = steps.clone();
            Self::renumber_steps(next);
        }
        if let Some(media) = &patch.media {
            next.media = media.clone();
        }
        if let Some(equipment) = &patch.equipment {
            next.equipment = equipment.clone();
        }
    }

    // ==========================================
    // 工序操作
    // ==========================================

    /// 追加带默认值的新工序,返回其 id
    pub fn add_step(recipe: &mut Recipe) -> String {
        let step = RecipeStep::new(recipe.steps.len() as u32 + 1);
        let id = step.id.clone();
        recipe.steps.push(step);
        id
    }

    /// 按序号原位修改工序
    pub fn update_step<F>(recipe: &mut Recipe, index: usize, mutate: F) -> EngineResult<()>
    where
        F: FnOnce(&mut RecipeStep),
    {
        let step = recipe.steps.get_mut(index).ok_or_else(|| {
            EngineError::validation("steps", format!("工序序号越界: {}", index))
        })?;
        mutate(step);
        Ok(())
    }

    /// 删除工序并重排
    pub fn remove_step(recipe: &mut Recipe, index: usize) -> EngineResult<()> {
        if index >= recipe.steps.len() {
            return Err(EngineError::validation(
                "steps",
                format!("工序序号越界: {}", index),
            ));
        }
        recipe.steps.remove(index);
        Self::renumber_steps(recipe);
        Ok(())
    }

    /// 相邻交换移动工序并重排;移动越过边界为 no-op
    pub fn move_step(recipe: &mut Recipe, index: usize, direction: MoveDirection) -> EngineResult<()> {
        if index >= recipe.steps.len() {
            return Err(EngineError::validation(
                "steps",
                format!("工序序号越界: {}", index),
            ));
        }
        let target = match direction {
            MoveDirection::Up => {
                if index == 0 {
                    return Ok(());
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 >= recipe.steps.len() {
                    return Ok(());
                }
                index + 1
            }
        };
        recipe.steps.swap(index, target);
        Self::renumber_steps(recipe);
        Ok(())
    }

    /// 重排 order 为 1..N 连续值
    fn renumber_steps(recipe: &mut Recipe) {
        for (i, step) in recipe.steps.iter_mut().enumerate() {
            step.order = i as u32 + 1;
        }
    }

    // ==========================================
    // 媒体操作
    // ==========================================

    /// 追加媒体;配方首个媒体自动成为主媒体
    pub fn add_media(recipe: &mut Recipe, mut media: RecipeMedia) {
        if recipe.media.is_empty() {
            media.is_primary = true;
        }
        recipe.media.push(media);
    }

    /// 删除媒体,返回被删除的记录(不存在时返回 None)
    pub fn remove_media(recipe: &mut Recipe, media_id: &str) -> Option<RecipeMedia> {
        let index = recipe.media.iter().position(|m| m.id == media_id)?;
        Some(recipe.media.remove(index))
    }

    /// 设置主媒体;其余媒体的主标记全部清除
    pub fn set_primary_media(recipe: &mut Recipe, media_id: &str) -> EngineResult<()> {
        if !recipe.media.iter().any(|m| m.id == media_id) {
            return Err(EngineError::validation(
                "media",
                format!("媒体不存在: {}", media_id),
            ));
        }
        for media in &mut recipe.media {
            media.is_primary = media.id == media_id;
        }
        Ok(())
    }

    /// 按 id 原位修改媒体明细
    pub fn update_media<F>(recipe: &mut Recipe, media_id: &str, mutate: F) -> EngineResult<()>
    where
        F: FnOnce(&mut RecipeMedia),
    {
        let media = recipe
            .media
            .iter_mut()
            .find(|m| m.id == media_id)
            .ok_or_else(|| {
                EngineError::validation("media", format!("媒体不存在: {}", media_id))
            })?;
        mutate(media);
        Ok(())
    }
}
