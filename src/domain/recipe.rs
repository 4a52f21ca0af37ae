// ==========================================
// 餐饮后厨管理系统 - 配方领域模型
// ==========================================
// 红线: 成本派生字段(ingredient_cost/total_cost/cost_per_*)
//       只能由成本引擎写入,任何变更后不得保持过期值
// 对齐: recipes 及其子表
// ==========================================

use crate::domain::allergen::AllergenInfo;
use crate::domain::quality::{RecipeQualityStandards, RecipeTraining};
use crate::domain::types::{
    MediaKind, RecipeType, TemperatureUnit, WarningLevel, WeightUnit, YieldUnit,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// RecipeIngredient - 配方原料
// ==========================================
// 红线: 单行成本 = quantity × unit_cost,总价不落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub kind: IngredientKind,            // raw: 原料 / prepared: 半成品
    pub name: String,
    pub quantity: f64,                   // 用量(数值,禁止自由文本)
    pub unit: String,                    // 用量单位
    pub unit_cost: f64,                  // 单位成本
    pub notes: Option<String>,
    pub prepared_item_id: Option<String>, // kind=prepared 时引用的配方 id
}

impl RecipeIngredient {
    /// 单行成本
    pub fn line_cost(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

// ==========================================
// IngredientKind - 原料种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    Raw,
    Prepared,
}

impl IngredientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientKind::Raw => "raw",
            IngredientKind::Prepared => "prepared",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "raw" => Some(IngredientKind::Raw),
            "prepared" => Some(IngredientKind::Prepared),
            _ => None,
        }
    }
}

// ==========================================
// TemperatureSpec - 工序温度要求
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSpec {
    pub value: f64,
    pub unit: TemperatureUnit,
}

// ==========================================
// RecipeStep - 配方工序
// ==========================================
// 不变量: order 从 1 开始连续编号,任何插入/删除/移动后必须重排
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub id: String,
    pub order: u32,                        // 1-based 序号
    pub instruction: String,
    pub notes: Option<String>,
    pub warning_level: Option<WarningLevel>,
    pub time_in_minutes: Option<u32>,
    pub equipment: Vec<String>,
    pub quality_checks: Vec<String>,
    pub media_urls: Vec<String>,
    pub is_quality_control_point: bool,    // 质量控制点
    pub is_critical_control_point: bool,   // 关键控制点(CCP,食品安全)
    pub temperature: Option<TemperatureSpec>,
}

impl RecipeStep {
    /// 创建带默认值的新工序（与表单"添加工序"行为一致）
    pub fn new(order: u32) -> Self {
        Self {
            id: format!("step-{}", Uuid::new_v4()),
            order,
            instruction: String::new(),
            notes: None,
            warning_level: Some(WarningLevel::Info),
            time_in_minutes: Some(0),
            equipment: Vec::new(),
            quality_checks: Vec::new(),
            media_urls: Vec::new(),
            is_quality_control_point: false,
            is_critical_control_point: false,
            temperature: None,
        }
    }
}

// ==========================================
// RecipeMedia - 配方媒体
// ==========================================
// 不变量: 每个配方至多一个 is_primary=true
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMedia {
    pub id: String,
    pub kind: MediaKind,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub timestamp: Option<i64>,     // 视频时间点(秒)
    pub step_id: Option<String>,    // 关联工序
    pub tags: Vec<String>,
    pub is_primary: bool,
}

// ==========================================
// RecipeYield - 配方产量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeYield {
    pub amount: f64,
    pub unit: YieldUnit,
    pub expected_weight: Option<ExpectedWeight>, // 预期成品重量
    pub portion_size: Option<String>,            // 单份规格描述
}

impl Default for RecipeYield {
    fn default() -> Self {
        Self {
            amount: 1.0,
            unit: YieldUnit::Portion,
            expected_weight: None,
            portion_size: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedWeight {
    pub value: f64,
    pub unit: WeightUnit,
}

// ==========================================
// RecipeEquipment - 配方设备引用
// ==========================================
// 说明: 只按 id 引用设备主数据,不拥有设备记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEquipment {
    pub id: String,
    pub name: String,
    pub station: String,
    pub is_required: bool,
    pub specifications: Option<String>,
    pub alternatives: Vec<String>,
}

// ==========================================
// RecipeVersion - 配方版本记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeVersion {
    pub id: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub changes: Vec<String>,           // 变更摘要
    pub reverted_from: Option<String>,  // 回滚来源版本
    pub approved: Option<VersionApproval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionApproval {
    pub by: String,
    pub at: DateTime<Utc>,
    pub notes: Option<String>,
}

// ==========================================
// Recipe - 配方聚合根
// ==========================================
// 所有子集合(原料/工序/媒体/版本/设备)归属本聚合,
// 跨聚合只允许 id 引用(半成品原料、设备)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    // ===== 标识 =====
    pub id: String,
    pub organization_id: String,         // 组织隔离键
    pub recipe_type: RecipeType,

    // ===== 基础信息 =====
    pub name: String,
    pub description: String,

    // ===== 分类路径(大类 → 品类 → 子类) =====
    pub major_group: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub station: String,                 // 工位

    // ===== 存储规范 =====
    pub storage_area: String,
    pub container: String,
    pub container_type: String,
    pub shelf_life: String,

    // ===== 时间(分钟) =====
    pub prep_time: u32,
    pub cook_time: u32,
    pub rest_time: Option<u32>,
    pub total_time: u32,                 // 派生: prep + cook + rest

    // ===== 产量与配比 =====
    pub recipe_unit_ratio: String,       // 自由文本配比,如 "4 servings"
    pub unit_type: String,
    #[serde(rename = "yield")]
    pub yield_info: RecipeYield,

    // ===== 原料与工序 =====
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,

    // ===== 媒体 =====
    pub image_url: Option<String>,       // 旧字段,保留兼容
    pub video_url: Option<String>,
    pub media: Vec<RecipeMedia>,

    // ===== 过敏原 =====
    pub allergen_info: AllergenInfo,

    // ===== 质量与培训 =====
    pub quality_standards: RecipeQualityStandards,
    pub training: RecipeTraining,

    // ===== 设备 =====
    pub equipment: Vec<RecipeEquipment>,

    // ===== 成本 =====
    pub labor_cost_per_hour: f64,
    pub ingredient_cost: f64,            // 派生
    pub total_cost: f64,                 // 派生
    pub cost_per_unit: f64,              // 派生
    pub cost_per_ratio_unit: f64,        // 派生
    pub cost_per_serving: f64,           // 派生
    pub target_cost_percent: f64,
    pub target_price: Option<f64>,       // 目标售价(成本占比基准)

    // ===== 版本 =====
    pub version: String,
    pub versions: Vec<RecipeVersion>,

    // ===== 备注与审计 =====
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub last_modified: DateTime<Utc>,
    pub modified_by: String,
}

impl Recipe {
    /// 创建空白配方（派生字段为 0，由成本引擎在首次保存前填充）
    pub fn new(organization_id: &str, name: &str, recipe_type: RecipeType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            recipe_type,
            name: name.to_string(),
            description: String::new(),
            major_group: None,
            category: None,
            sub_category: None,
            station: String::new(),
            storage_area: String::new(),
            container: String::new(),
            container_type: String::new(),
            shelf_life: String::new(),
            prep_time: 0,
            cook_time: 0,
            rest_time: None,
            total_time: 0,
            recipe_unit_ratio: "1".to_string(),
            unit_type: String::new(),
            yield_info: RecipeYield::default(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            image_url: None,
            video_url: None,
            media: Vec::new(),
            allergen_info: AllergenInfo::new(),
            quality_standards: RecipeQualityStandards::default(),
            training: RecipeTraining::default(),
            equipment: Vec::new(),
            labor_cost_per_hour: 0.0,
            ingredient_cost: 0.0,
            total_cost: 0.0,
            cost_per_unit: 0.0,
            cost_per_ratio_unit: 0.0,
            cost_per_serving: 0.0,
            target_cost_percent: 0.0,
            target_price: None,
            version: "1.0".to_string(),
            versions: Vec::new(),
            notes: None,
            created_at: now,
            created_by: String::new(),
            last_modified: now,
            modified_by: String::new(),
        }
    }

    /// 主媒体（is_primary=true 的媒体记录）
    pub fn primary_media(&self) -> Option<&RecipeMedia> {
        self.media.iter().find(|m| m.is_primary)
    }
}
