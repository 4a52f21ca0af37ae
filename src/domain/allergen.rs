// ==========================================
// 餐饮后厨管理系统 - 过敏原领域模型
// ==========================================
// 红线: 过敏原枚举为固定集合,不允许自由文本
// 用途: 配方过敏原标注(含有/可能含有/交叉接触风险)
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// Allergen - 过敏原枚举
// ==========================================
// 序列化格式: snake_case (与数据库 JSON 列一致)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Peanut,     // 花生
    Crustacean, // 甲壳类
    Treenut,    // 木本坚果
    Shellfish,  // 贝类
    Sesame,     // 芝麻
    Soy,        // 大豆
    Fish,       // 鱼类
    Wheat,      // 小麦
    Milk,       // 乳制品
    Sulphite,   // 亚硫酸盐
    Egg,        // 蛋类
    Gluten,     // 麸质
    Mustard,    // 芥末
    Celery,     // 芹菜
    Garlic,     // 大蒜
    Onion,      // 洋葱
    Nitrite,    // 亚硝酸盐
    Mushroom,   // 菌菇
    HotPepper,  // 辣椒
    Citrus,     // 柑橘
    Pork,       // 猪肉
}

impl Allergen {
    /// 全部过敏原（固定顺序，用于表单渲染与遍历）
    pub const ALL: [Allergen; 21] = [
        Allergen::Peanut,
        Allergen::Crustacean,
        Allergen::Treenut,
        Allergen::Shellfish,
        Allergen::Sesame,
        Allergen::Soy,
        Allergen::Fish,
        Allergen::Wheat,
        Allergen::Milk,
        Allergen::Sulphite,
        Allergen::Egg,
        Allergen::Gluten,
        Allergen::Mustard,
        Allergen::Celery,
        Allergen::Garlic,
        Allergen::Onion,
        Allergen::Nitrite,
        Allergen::Mushroom,
        Allergen::HotPepper,
        Allergen::Citrus,
        Allergen::Pork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Allergen::Peanut => "peanut",
            Allergen::Crustacean => "crustacean",
            Allergen::Treenut => "treenut",
            Allergen::Shellfish => "shellfish",
            Allergen::Sesame => "sesame",
            Allergen::Soy => "soy",
            Allergen::Fish => "fish",
            Allergen::Wheat => "wheat",
            Allergen::Milk => "milk",
            Allergen::Sulphite => "sulphite",
            Allergen::Egg => "egg",
            Allergen::Gluten => "gluten",
            Allergen::Mustard => "mustard",
            Allergen::Celery => "celery",
            Allergen::Garlic => "garlic",
            Allergen::Onion => "onion",
            Allergen::Nitrite => "nitrite",
            Allergen::Mushroom => "mushroom",
            Allergen::HotPepper => "hot_pepper",
            Allergen::Citrus => "citrus",
            Allergen::Pork => "pork",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Allergen::ALL.iter().copied().find(|a| a.as_str() == s)
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// AllergenInfo - 配方过敏原标注
// ==========================================
// 不变量:
// - contains 中的过敏原不出现在 may_contain / cross_contact_risk
// - cross_contact_risk 中且不在 contains 的过敏原必在 may_contain
// 集合迁移规则由 engine::allergen::AllergenReconciler 维护
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenInfo {
    pub contains: BTreeSet<Allergen>,           // 含有
    pub may_contain: BTreeSet<Allergen>,        // 可能含有
    pub cross_contact_risk: BTreeSet<Allergen>, // 交叉接触风险
}

impl AllergenInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否完全无过敏原标注
    pub fn is_empty(&self) -> bool {
        self.contains.is_empty()
            && self.may_contain.is_empty()
            && self.cross_contact_risk.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allergen_parse_roundtrip() {
        for allergen in Allergen::ALL {
            assert_eq!(Allergen::parse(allergen.as_str()), Some(allergen));
        }
        assert_eq!(Allergen::parse("unknown"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Allergen::HotPepper).unwrap();
        assert_eq!(json, "\"hot_pepper\"");
        let parsed: Allergen = serde_json::from_str("\"treenut\"").unwrap();
        assert_eq!(parsed, Allergen::Treenut);
    }

    #[test]
    fn test_allergen_info_default_empty() {
        let info = AllergenInfo::new();
        assert!(info.is_empty());
    }
}
