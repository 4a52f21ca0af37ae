// ==========================================
// 餐饮后厨管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎(成本/分类/过敏原/聚合合并)
// 红线: Engine 不拼 SQL, 无 I/O, 全部为纯函数
// ==========================================

pub mod aggregate;
pub mod allergen;
pub mod classification;
pub mod cost;
pub mod error;
pub mod ratio;

// 重导出核心引擎
pub use aggregate::{MoveDirection, RecipeAggregateBuilder};
pub use allergen::AllergenReconciler;
pub use classification::ClassificationResolver;
pub use cost::{CostBreakdown, CostEngine};
pub use error::{EngineError, EngineResult};
pub use ratio::{parse_unit_ratio, UnitRatio};
