// ==========================================
// 餐饮后厨管理系统 - 配方补丁类型
// ==========================================
// 职责: 以字段级 Option 表达部分更新,替代无类型的结构展开合并
// 合并规则:
// - 顶层字段浅合并(Some 覆盖,None 保留)
// - yield/storage/quality_standards 按嵌套补丁"深一层"合并
// - 列表字段(ingredients/steps/media/equipment)整体替换
// - Option<Option<T>> 字段: Some(None) 表示清空,None 表示不变
// 合并本身由 engine::aggregate::RecipeAggregateBuilder 执行
// ==========================================

use crate::domain::allergen::AllergenInfo;
use crate::domain::quality::{
    AppearanceStandard, PlatingInstructions, RecipeTraining, TemperatureStandard,
};
use crate::domain::recipe::{
    ExpectedWeight, RecipeEquipment, RecipeIngredient, RecipeMedia, RecipeStep,
};
use crate::domain::types::{RecipeType, YieldUnit};
use serde::{Deserialize, Serialize};

// ==========================================
// RecipePatch - 配方部分更新
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipePatch {
    // ===== 基础信息 =====
    pub name: Option<String>,
    pub description: Option<String>,
    pub recipe_type: Option<RecipeType>,
    pub station: Option<String>,
    pub notes: Option<Option<String>>,

    // ===== 分类路径 =====
    // 级联规则: major_group 变更清空 category + sub_category,
    //           category 变更清空 sub_category
    pub major_group: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub sub_category: Option<Option<String>>,

    // ===== 存储规范(深一层合并) =====
    pub storage: Option<StoragePatch>,

    // ===== 时间(分钟) =====
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub rest_time: Option<Option<u32>>,

    // ===== 产量与配比 =====
    pub recipe_unit_ratio: Option<String>,
    pub unit_type: Option<String>,
    #[serde(rename = "yield")]
    pub yield_patch: Option<YieldPatch>,

    // ===== 列表字段(整体替换) =====
    pub ingredients: Option<Vec<RecipeIngredient>>,
    pub steps: Option<Vec<RecipeStep>>,
    pub media: Option<Vec<RecipeMedia>>,
    pub equipment: Option<Vec<RecipeEquipment>>,

    // ===== 媒体旧字段 =====
    pub image_url: Option<Option<String>>,
    pub video_url: Option<Option<String>>,

    // ===== 过敏原(整体替换) =====
    pub allergen_info: Option<AllergenInfo>,

    // ===== 质量与培训 =====
    pub quality_standards: Option<QualityStandardsPatch>,
    pub training: Option<RecipeTraining>,

    // ===== 成本输入 =====
    pub labor_cost_per_hour: Option<f64>,
    pub target_cost_percent: Option<f64>,
    pub target_price: Option<Option<f64>>,
}

// ==========================================
// StoragePatch - 存储规范补丁
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePatch {
    pub storage_area: Option<String>,
    pub container: Option<String>,
    pub container_type: Option<String>,
    pub shelf_life: Option<String>,
}

// ==========================================
// YieldPatch - 产量补丁
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldPatch {
    pub amount: Option<f64>,
    pub unit: Option<YieldUnit>,
    pub expected_weight: Option<Option<ExpectedWeight>>,
    pub portion_size: Option<Option<String>>,
}

// ==========================================
// QualityStandardsPatch - 质量标准补丁
// ==========================================
// 深一层合并: 子对象(appearance/temperature/plating)整体替换
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityStandardsPatch {
    pub appearance: Option<AppearanceStandard>,
    pub texture: Option<Vec<String>>,
    pub taste: Option<Vec<String>>,
    pub aroma: Option<Vec<String>>,
    pub temperature: Option<TemperatureStandard>,
    pub plating_instructions: Option<Option<PlatingInstructions>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patch_has_no_fields() {
        let patch = RecipePatch::default();
        assert!(patch.name.is_none());
        assert!(patch.yield_patch.is_none());
        assert!(patch.ingredients.is_none());
    }
}
