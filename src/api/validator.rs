// ==========================================
// 餐饮后厨管理系统 - 配方校验器
// ==========================================
// 职责: 写入前的字段校验
// 红线: 校验失败快速返回,不做静默修正
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::recipe::Recipe;

// ==========================================
// RecipeValidator - 配方校验器
// ==========================================

/// 配方校验器
///
/// 职责：
/// 1. 必填字段校验（名称）
/// 2. 数值范围校验（产量、时间、成本输入）
pub struct RecipeValidator;

impl RecipeValidator {
    /// 校验配方可写入
    ///
    /// # 返回
    /// - Ok(()): 校验通过
    /// - Err(ApiError::ValidationError): 首个违规字段与原因
    pub fn validate(recipe: &Recipe) -> ApiResult<()> {
        if recipe.name.trim().is_empty() {
            return Err(ApiError::validation("name", "配方名称不能为空"));
        }
        if recipe.organization_id.trim().is_empty() {
            return Err(ApiError::validation("organization_id", "组织标识不能为空"));
        }
        if !recipe.yield_info.amount.is_finite() || recipe.yield_info.amount <= 0.0 {
            return Err(ApiError::validation(
                "yield.amount",
                format!("产量必须为正数: {}", recipe.yield_info.amount),
            ));
        }
        if !recipe.labor_cost_per_hour.is_finite() || recipe.labor_cost_per_hour < 0.0 {
            return Err(ApiError::validation(
                "labor_cost_per_hour",
                format!("时薪不能为负数: {}", recipe.labor_cost_per_hour),
            ));
        }
        if !recipe.target_cost_percent.is_finite()
            || recipe.target_cost_percent < 0.0
            || recipe.target_cost_percent > 100.0
        {
            return Err(ApiError::validation(
                "target_cost_percent",
                format!("目标成本占比必须在 0-100 之间: {}", recipe.target_cost_percent),
            ));
        }
        if let Some(price) = recipe.target_price {
            if !price.is_finite() || price < 0.0 {
                return Err(ApiError::validation(
                    "target_price",
                    format!("目标售价不能为负数: {}", price),
                ));
            }
        }
        for ingredient in &recipe.ingredients {
            if !ingredient.quantity.is_finite() || ingredient.quantity < 0.0 {
                return Err(ApiError::validation(
                    "ingredients.quantity",
                    format!("原料 {} 用量不能为负数", ingredient.name),
                ));
            }
            if !ingredient.unit_cost.is_finite() || ingredient.unit_cost < 0.0 {
                return Err(ApiError::validation(
                    "ingredients.unit_cost",
                    format!("原料 {} 单位成本不能为负数", ingredient.name),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RecipeType;

    #[test]
    fn test_blank_name_rejected() {
        let recipe = Recipe::new("org-1", "  ", RecipeType::Final);
        assert!(matches!(
            RecipeValidator::validate(&recipe),
            Err(ApiError::ValidationError { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_non_positive_yield_rejected() {
        let mut recipe = Recipe::new("org-1", "测试", RecipeType::Final);
        recipe.yield_info.amount = 0.0;
        assert!(matches!(
            RecipeValidator::validate(&recipe),
            Err(ApiError::ValidationError { field, .. }) if field == "yield.amount"
        ));
    }

    #[test]
    fn test_target_percent_range() {
        let mut recipe = Recipe::new("org-1", "测试", RecipeType::Final);
        recipe.target_cost_percent = 120.0;
        assert!(RecipeValidator::validate(&recipe).is_err());
        recipe.target_cost_percent = 35.0;
        assert!(RecipeValidator::validate(&recipe).is_ok());
    }
}
