// ==========================================
// 餐饮后厨管理系统 - 领域类型定义
// ==========================================
// 序列化格式: 与数据库/前端一致的小写字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 配方类型 (Recipe Type)
// ==========================================
// prepared: 半成品(可被其他配方引用为原料)
// final: 成品(直接出品)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeType {
    Prepared,
    Final,
}

impl RecipeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Prepared => "prepared",
            RecipeType::Final => "final",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "prepared" => Some(RecipeType::Prepared),
            "final" => Some(RecipeType::Final),
            _ => None,
        }
    }
}

impl fmt::Display for RecipeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 工序警示级别 (Warning Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Info,     // 提示
    Warning,  // 警告
    Critical, // 严重
}

impl WarningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::Info => "info",
            WarningLevel::Warning => "warning",
            WarningLevel::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(WarningLevel::Info),
            "warning" => Some(WarningLevel::Warning),
            "critical" => Some(WarningLevel::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 媒体类型 (Media Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// 按文件扩展名推断媒体类型（未识别扩展名按图片处理）
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = file_name
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "mp4" | "mov" | "webm" | "avi" | "mkv" => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 温度单位 (Temperature Unit)
// ==========================================
// 序列化格式: "F" / "C"（与前端表单一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    F, // 华氏度
    C, // 摄氏度
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::F => "F",
            TemperatureUnit::C => "C",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "F" => Some(TemperatureUnit::F),
            "C" => Some(TemperatureUnit::C),
            _ => None,
        }
    }
}

// ==========================================
// 产量单位 (Yield Unit)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldUnit {
    Portion, // 份
    Serving, // 客
    Kg,      // 千克
    G,       // 克
    Each,    // 个
}

impl YieldUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            YieldUnit::Portion => "portion",
            YieldUnit::Serving => "serving",
            YieldUnit::Kg => "kg",
            YieldUnit::G => "g",
            YieldUnit::Each => "each",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "portion" => Some(YieldUnit::Portion),
            "serving" => Some(YieldUnit::Serving),
            "kg" => Some(YieldUnit::Kg),
            "g" => Some(YieldUnit::G),
            "each" => Some(YieldUnit::Each),
            _ => None,
        }
    }
}

impl fmt::Display for YieldUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 重量单位 (Weight Unit)
// ==========================================
// 用途: 预期成品重量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Oz,
    Lb,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::G => "g",
            WeightUnit::Kg => "kg",
            WeightUnit::Oz => "oz",
            WeightUnit::Lb => "lb",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "g" => Some(WeightUnit::G),
            "kg" => Some(WeightUnit::Kg),
            "oz" => Some(WeightUnit::Oz),
            "lb" => Some(WeightUnit::Lb),
            _ => None,
        }
    }
}

// ==========================================
// 技能等级 (Skill Level)
// ==========================================
// 用途: 培训要求
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,     // 初级
    Intermediate, // 中级
    Advanced,     // 高级
    Expert,       // 专家
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(SkillLevel::Beginner),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            "expert" => Some(SkillLevel::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_type_roundtrip() {
        assert_eq!(RecipeType::parse("prepared"), Some(RecipeType::Prepared));
        assert_eq!(RecipeType::parse("final"), Some(RecipeType::Final));
        assert_eq!(RecipeType::parse("other"), None);
        assert_eq!(RecipeType::Final.as_str(), "final");
    }

    #[test]
    fn test_media_kind_from_file_name() {
        assert_eq!(MediaKind::from_file_name("photo.JPG"), MediaKind::Image);
        assert_eq!(MediaKind::from_file_name("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_file_name("noext"), MediaKind::Image);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&WarningLevel::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let level: WarningLevel = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(level, WarningLevel::Warning);
    }
}
