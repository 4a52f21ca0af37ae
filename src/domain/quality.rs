// ==========================================
// 餐饮后厨管理系统 - 质量标准与培训要求
// ==========================================
// 对齐: recipe_quality_standards / recipe_training 表(每配方一行)
// ==========================================

use crate::domain::types::{SkillLevel, TemperatureUnit};
use serde::{Deserialize, Serialize};

// ==========================================
// RecipeQualityStandards - 出品质量标准
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeQualityStandards {
    pub appearance: AppearanceStandard,
    pub texture: Vec<String>,   // 口感要求
    pub taste: Vec<String>,     // 味道要求
    pub aroma: Vec<String>,     // 香气要求
    pub temperature: TemperatureStandard, // 出品温度
    pub plating_instructions: Option<PlatingInstructions>,
}

impl Default for RecipeQualityStandards {
    fn default() -> Self {
        Self {
            appearance: AppearanceStandard::default(),
            texture: Vec::new(),
            taste: Vec::new(),
            aroma: Vec::new(),
            temperature: TemperatureStandard::default(),
            plating_instructions: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceStandard {
    pub description: String,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStandard {
    pub value: f64,
    pub unit: TemperatureUnit,
    pub tolerance: f64, // 允许偏差(±)
}

impl Default for TemperatureStandard {
    fn default() -> Self {
        Self {
            value: 0.0,
            unit: TemperatureUnit::F,
            tolerance: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatingInstructions {
    pub description: String,
    pub image_url: Option<String>,
}

// ==========================================
// RecipeTraining - 培训要求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeTraining {
    pub required_skill_level: SkillLevel,
    pub certification_required: Vec<String>,
    pub common_errors: Vec<String>,
    pub key_techniques: Vec<String>,
    pub safety_protocols: Vec<String>,
    pub quality_standards: Vec<String>,
    pub notes: Option<String>,
}

impl Default for RecipeTraining {
    fn default() -> Self {
        Self {
            required_skill_level: SkillLevel::Beginner,
            certification_required: Vec::new(),
            common_errors: Vec::new(),
            key_techniques: Vec::new(),
            safety_protocols: Vec::new(),
            quality_standards: Vec::new(),
            notes: None,
        }
    }
}
