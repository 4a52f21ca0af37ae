// ==========================================
// 餐饮后厨管理系统 - 成本引擎
// ==========================================
// 职责: 提供配方成本派生的纯逻辑
// 红线: 无状态、无副作用、无 I/O 操作
// 红线: 派生字段在任何成本相关变更后同步重算,不得保持过期值
//       (重算触发由聚合合并器负责,本引擎只做快照计算)
// ==========================================

use crate::domain::recipe::{Recipe, RecipeIngredient};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::ratio::parse_unit_ratio;
use serde::{Deserialize, Serialize};

// ==========================================
// CostBreakdown - 成本计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub ingredient_cost: f64,    // 原料成本合计
    pub labor_cost: f64,         // 人工成本
    pub total_cost: f64,         // 总成本 = 原料 + 人工
    pub cost_per_unit: f64,      // 总成本 / 产量
    pub cost_per_ratio_unit: f64, // 总成本 / 配比数量
    pub cost_per_serving: f64,   // 总成本 / 配比数量(出品口径,与历史列对齐)
}

// ==========================================
// CostEngine - 成本计算纯函数类
// ==========================================
pub struct CostEngine;

impl CostEngine {
    /// 原料成本合计
    ///
    /// # 规则
    /// - ingredient_cost = Σ(quantity × unit_cost)
    /// - 单行总价永远由数量×单价派生,不接受预乘总价
    pub fn ingredient_cost(ingredients: &[RecipeIngredient]) -> f64 {
        ingredients.iter().map(|i| i.line_cost()).sum()
    }

    /// 人工成本
    ///
    /// # 规则
    /// - labor_cost = (prep_time + cook_time) / 60 × labor_cost_per_hour
    /// - rest_time 不计入人工成本(计入展示用 total_time)
    pub fn labor_cost(prep_time: u32, cook_time: u32, labor_cost_per_hour: f64) -> f64 {
        f64::from(prep_time + cook_time) / 60.0 * labor_cost_per_hour
    }

    /// 展示用总时长(分钟)
    pub fn total_time(prep_time: u32, cook_time: u32, rest_time: Option<u32>) -> u32 {
        prep_time + cook_time + rest_time.unwrap_or(0)
    }

    /// 成本超标判定
    ///
    /// # 规则
    /// - is_over_target = total_cost > target_price × target_cost_percent / 100
    /// - 无目标售价时不判定(返回 false)
    pub fn is_over_target(
        total_cost: f64,
        target_price: Option<f64>,
        target_cost_percent: f64,
    ) -> bool {
        match target_price {
            Some(price) => total_cost > price * target_cost_percent / 100.0,
            None => false,
        }
    }

    /// 计算配方成本快照
    ///
    /// # 规则
    /// - ingredient_cost = Σ(quantity × unit_cost)
    /// - labor_cost = (prep + cook) / 60 × labor_cost_per_hour
    /// - total_cost = ingredient_cost + labor_cost
    /// - cost_per_unit = total_cost / yield.amount (yield.amount <= 0 报错)
    /// - cost_per_ratio_unit / cost_per_serving = total_cost / 配比数量
    ///   (配比来自 recipe_unit_ratio 文本,解析失败报错)
    ///
    /// # 错误
    /// - NonPositiveYield: yield.amount <= 0
    /// - UnparsableRatio: recipe_unit_ratio 无法解析
    pub fn calculate(recipe: &Recipe) -> EngineResult<CostBreakdown> {
        let ingredient_cost = Self::ingredient_cost(&recipe.ingredients);
        let labor_cost =
            Self::labor_cost(recipe.prep_time, recipe.cook_time, recipe.labor_cost_per_hour);
        let total_cost = ingredient_cost + labor_cost;

        let yield_amount = recipe.yield_info.amount;
        if !yield_amount.is_finite() || yield_amount <= 0.0 {
            return Err(EngineError::NonPositiveYield(yield_amount));
        }
        let cost_per_unit = total_cost / yield_amount;

        let ratio = parse_unit_ratio(&recipe.recipe_unit_ratio)?;
        let cost_per_ratio_unit = total_cost / ratio.count;

        Ok(CostBreakdown {
            ingredient_cost,
            labor_cost,
            total_cost,
            cost_per_unit,
            cost_per_ratio_unit,
            cost_per_serving: cost_per_ratio_unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::IngredientKind;
    use crate::domain::types::RecipeType;

    fn ingredient(quantity: f64, unit_cost: f64) -> RecipeIngredient {
        RecipeIngredient {
            id: format!("ing-{}", quantity),
            kind: IngredientKind::Raw,
            name: "测试原料".to_string(),
            quantity,
            unit: "kg".to_string(),
            unit_cost,
            notes: None,
            prepared_item_id: None,
        }
    }

    fn sample_recipe() -> Recipe {
        let mut recipe = Recipe::new("org-1", "测试配方", RecipeType::Final);
        recipe.ingredients = vec![ingredient(2.0, 1.5), ingredient(1.0, 3.0)];
        recipe.prep_time = 10;
        recipe.cook_time = 20;
        recipe.labor_cost_per_hour = 18.0;
        recipe.yield_info.amount = 5.0;
        recipe.recipe_unit_ratio = "4 servings".to_string();
        recipe
    }

    #[test]
    fn test_worked_example() {
        // ingredients [{2, 1.50}, {1, 3.00}], prep 10, cook 20, rate 18
        // → 6.00 / 9.00 / 15.00; yield 5 → cost_per_unit 3.00
        let recipe = sample_recipe();
        let costs = CostEngine::calculate(&recipe).unwrap();
        assert_eq!(costs.ingredient_cost, 6.0);
        assert_eq!(costs.labor_cost, 9.0);
        assert_eq!(costs.total_cost, 15.0);
        assert_eq!(costs.cost_per_unit, 3.0);
        assert_eq!(costs.cost_per_ratio_unit, 3.75);
        assert_eq!(costs.cost_per_serving, 3.75);
    }

    #[test]
    fn test_total_is_ingredient_plus_labor() {
        let mut recipe = sample_recipe();
        recipe.ingredients.push(ingredient(3.0, 0.4));
        let costs = CostEngine::calculate(&recipe).unwrap();
        assert!((costs.total_cost - (costs.ingredient_cost + costs.labor_cost)).abs() < 1e-9);
    }

    #[test]
    fn test_rest_time_excluded_from_labor() {
        let mut recipe = sample_recipe();
        recipe.rest_time = Some(60);
        let costs = CostEngine::calculate(&recipe).unwrap();
        // 人工成本仍按 30 分钟计
        assert_eq!(costs.labor_cost, 9.0);
        assert_eq!(CostEngine::total_time(10, 20, Some(60)), 90);
    }

    #[test]
    fn test_non_positive_yield_rejected() {
        let mut recipe = sample_recipe();
        recipe.yield_info.amount = 0.0;
        assert!(matches!(
            CostEngine::calculate(&recipe),
            Err(EngineError::NonPositiveYield(_))
        ));

        recipe.yield_info.amount = -2.0;
        assert!(matches!(
            CostEngine::calculate(&recipe),
            Err(EngineError::NonPositiveYield(_))
        ));
    }

    #[test]
    fn test_unparsable_ratio_rejected() {
        let mut recipe = sample_recipe();
        recipe.recipe_unit_ratio = "many servings".to_string();
        assert!(matches!(
            CostEngine::calculate(&recipe),
            Err(EngineError::UnparsableRatio(_))
        ));
    }

    #[test]
    fn test_empty_ingredients_is_labor_only() {
        let mut recipe = sample_recipe();
        recipe.ingredients.clear();
        let costs = CostEngine::calculate(&recipe).unwrap();
        assert_eq!(costs.ingredient_cost, 0.0);
        assert_eq!(costs.total_cost, 9.0);
    }

    #[test]
    fn test_over_target_against_target_price() {
        // 总成本 15, 目标售价 50, 目标成本占比 40% → 阈值 20, 未超标
        assert!(!CostEngine::is_over_target(15.0, Some(50.0), 40.0));
        // 阈值 50 × 20% = 10 → 超标
        assert!(CostEngine::is_over_target(15.0, Some(50.0), 20.0));
        // 无目标售价 → 不判定
        assert!(!CostEngine::is_over_target(15.0, None, 40.0));
    }
}
