// ==========================================
// 餐饮后厨管理系统 - 过敏原集合调和器
// ==========================================
// 职责: 维护 含有/可能含有/交叉接触风险 三个集合的迁移规则
// 红线: 纯集合变换,幂等;同值重复切换为 no-op
// ==========================================
// 迁移规则:
// - 标记"含有" → 从 可能含有/交叉接触风险 中移除
// - 取消"含有" → 只移除 含有,不回补(已知不对称,非回滚定律)
// - 标记"交叉接触风险" 且不在 含有 → 同时加入 可能含有
// - 取消"交叉接触风险" → 同时从 可能含有 移除
// ==========================================

use crate::domain::allergen::{Allergen, AllergenInfo};

pub struct AllergenReconciler;

impl AllergenReconciler {
    /// 切换"含有"标记
    pub fn toggle_contains(state: &AllergenInfo, allergen: Allergen, contained: bool) -> AllergenInfo {
        let mut next = state.clone();
        if contained {
            next.contains.insert(allergen);
            next.may_contain.remove(&allergen);
            next.cross_contact_risk.remove(&allergen);
        } else {
            next.contains.remove(&allergen);
        }
        next
    }

    /// 切换"交叉接触风险"标记
    pub fn toggle_cross_contact(
        state: &AllergenInfo,
        allergen: Allergen,
        at_risk: bool,
    ) -> AllergenInfo {
        let mut next = state.clone();
        if at_risk {
            next.cross_contact_risk.insert(allergen);
            if !next.contains.contains(&allergen) {
                next.may_contain.insert(allergen);
            }
        } else {
            next.cross_contact_risk.remove(&allergen);
            next.may_contain.remove(&allergen);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_removes_from_other_sets() {
        // peanut 先标记为 可能含有,再标记 含有 → 必须从 可能含有 移除
        let mut state = AllergenInfo::new();
        state.may_contain.insert(Allergen::Peanut);

        let next = AllergenReconciler::toggle_contains(&state, Allergen::Peanut, true);
        assert!(next.contains.contains(&Allergen::Peanut));
        assert!(next.may_contain.is_empty());
        assert!(next.cross_contact_risk.is_empty());
    }

    #[test]
    fn test_contains_off_does_not_restore() {
        // 取消 含有 不自动回补 可能含有/交叉接触风险(已知不对称)
        let mut state = AllergenInfo::new();
        state.may_contain.insert(Allergen::Milk);
        state.cross_contact_risk.insert(Allergen::Milk);

        let on = AllergenReconciler::toggle_contains(&state, Allergen::Milk, true);
        let off = AllergenReconciler::toggle_contains(&on, Allergen::Milk, false);
        assert!(!off.contains.contains(&Allergen::Milk));
        assert!(off.may_contain.is_empty());
        assert!(off.cross_contact_risk.is_empty());
    }

    #[test]
    fn test_cross_contact_adds_may_contain() {
        let state = AllergenInfo::new();
        let next = AllergenReconciler::toggle_cross_contact(&state, Allergen::Sesame, true);
        assert!(next.cross_contact_risk.contains(&Allergen::Sesame));
        assert!(next.may_contain.contains(&Allergen::Sesame));
    }

    #[test]
    fn test_cross_contact_skips_may_contain_when_contained() {
        let mut state = AllergenInfo::new();
        state.contains.insert(Allergen::Sesame);

        let next = AllergenReconciler::toggle_cross_contact(&state, Allergen::Sesame, true);
        assert!(next.cross_contact_risk.contains(&Allergen::Sesame));
        assert!(!next.may_contain.contains(&Allergen::Sesame));
    }

    #[test]
    fn test_cross_contact_off_removes_may_contain() {
        let state = AllergenInfo::new();
        let on = AllergenReconciler::toggle_cross_contact(&state, Allergen::Wheat, true);
        let off = AllergenReconciler::toggle_cross_contact(&on, Allergen::Wheat, false);
        assert!(off.cross_contact_risk.is_empty());
        assert!(off.may_contain.is_empty());
    }

    #[test]
    fn test_idempotent_toggles() {
        let state = AllergenInfo::new();
        let once = AllergenReconciler::toggle_contains(&state, Allergen::Egg, true);
        let twice = AllergenReconciler::toggle_contains(&once, Allergen::Egg, true);
        assert_eq!(once, twice);

        let cc_once = AllergenReconciler::toggle_cross_contact(&state, Allergen::Soy, true);
        let cc_twice = AllergenReconciler::toggle_cross_contact(&cc_once, Allergen::Soy, true);
        assert_eq!(cc_once, cc_twice);

        let off_once = AllergenReconciler::toggle_contains(&state, Allergen::Egg, false);
        assert_eq!(off_once, state);
    }
}
