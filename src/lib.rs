// ==========================================
// 餐饮后厨管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 后厨配方/成本/过敏原管理核心
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 媒体对象存储 - 外部存储边界
pub mod storage;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组合根
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    MediaKind, RecipeType, SkillLevel, TemperatureUnit, WarningLevel, WeightUnit, YieldUnit,
};

// 领域实体
pub use domain::{
    ActionLog, ActionType, Allergen, AllergenInfo, Category, MajorGroup, Recipe, RecipeEquipment,
    RecipeIngredient, RecipeMedia, RecipePatch, RecipeStep, RecipeVersion, RecipeYield,
    SubCategory,
};

// 引擎
pub use engine::{
    AllergenReconciler, ClassificationResolver, CostBreakdown, CostEngine, RecipeAggregateBuilder,
    UnitRatio,
};

// API
pub use api::{ClassificationApi, MediaApi, RecipeApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "餐饮后厨管理系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
