// ==========================================
// 餐饮后厨管理系统 - 分类层级领域模型
// ==========================================
// 层级: 大类(MajorGroup) → 品类(Category) → 子类(SubCategory)
// 用途: 约束配方分类下拉选择,父级变更时级联清空子级
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 大类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorGroup {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// 品类（隶属某一大类）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub organization_id: String,
    pub group_id: String, // 所属大类
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// 子类（隶属某一品类）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: String,
    pub organization_id: String,
    pub category_id: String, // 所属品类
    pub name: String,
    pub created_at: DateTime<Utc>,
}
