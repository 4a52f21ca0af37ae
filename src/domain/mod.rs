// ==========================================
// 餐饮后厨管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、补丁结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod allergen;
pub mod classification;
pub mod patch;
pub mod quality;
pub mod recipe;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use allergen::{Allergen, AllergenInfo};
pub use classification::{Category, MajorGroup, SubCategory};
pub use patch::{QualityStandardsPatch, RecipePatch, StoragePatch, YieldPatch};
pub use quality::{
    AppearanceStandard, PlatingInstructions, RecipeQualityStandards, RecipeTraining,
    TemperatureStandard,
};
pub use recipe::{
    ExpectedWeight, IngredientKind, Recipe, RecipeEquipment, RecipeIngredient, RecipeMedia,
    RecipeStep, RecipeVersion, RecipeYield, TemperatureSpec, VersionApproval,
};
pub use types::{
    MediaKind, RecipeType, SkillLevel, TemperatureUnit, WarningLevel, WeightUnit, YieldUnit,
};
