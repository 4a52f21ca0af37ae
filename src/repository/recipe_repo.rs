// ==========================================
// 餐饮后厨管理系统 - 配方聚合仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 配方聚合跨 recipes + 7 张子表,写入走事务
// ==========================================

mod aggregate;
mod children;

pub use aggregate::RecipeRepository;
