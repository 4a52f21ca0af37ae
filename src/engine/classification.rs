// ==========================================
// 餐饮后厨管理系统 - 分类级联解析器
// ==========================================
// 职责: 按父级选择过滤有效子级;父级变更时级联清空子级选择
// 红线: 无状态、无 I/O;未匹配父级返回空序列,不报错
// ==========================================

use crate::domain::classification::{Category, SubCategory};

pub struct ClassificationResolver;

impl ClassificationResolver {
    /// 某大类下的品类(保持输入顺序)
    pub fn categories_of<'a>(group_id: &str, all: &'a [Category]) -> Vec<&'a Category> {
        all.iter().filter(|c| c.group_id == group_id).collect()
    }

    /// 某品类下的子类(保持输入顺序)
    pub fn sub_categories_of<'a>(
        category_id: &str,
        all: &'a [SubCategory],
    ) -> Vec<&'a SubCategory> {
        all.iter().filter(|s| s.category_id == category_id).collect()
    }

    /// 大类变更后的级联清空
    ///
    /// # 规则
    /// - 大类变化 → 品类、子类全部清空
    /// - 返回 (category, sub_category) 的新值
    pub fn cascade_on_group_change(
        old_group: Option<&str>,
        new_group: Option<&str>,
        category: Option<String>,
        sub_category: Option<String>,
    ) -> (Option<String>, Option<String>) {
        if old_group != new_group {
            (None, None)
        } else {
            (category, sub_category)
        }
    }

    /// 品类变更后的级联清空
    ///
    /// # 规则
    /// - 品类变化 → 子类清空
    pub fn cascade_on_category_change(
        old_category: Option<&str>,
        new_category: Option<&str>,
        sub_category: Option<String>,
    ) -> Option<String> {
        if old_category != new_category {
            None
        } else {
            sub_category
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: &str, group_id: &str) -> Category {
        Category {
            id: id.to_string(),
            organization_id: "org-1".to_string(),
            group_id: group_id.to_string(),
            name: id.to_string(),
            created_at: Utc::now(),
        }
    }

    fn sub_category(id: &str, category_id: &str) -> SubCategory {
        SubCategory {
            id: id.to_string(),
            organization_id: "org-1".to_string(),
            category_id: category_id.to_string(),
            name: id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_categories_filtered_by_group() {
        let all = vec![
            category("cat-soup", "grp-hot"),
            category("cat-grill", "grp-hot"),
            category("cat-salad", "grp-cold"),
        ];
        let hot = ClassificationResolver::categories_of("grp-hot", &all);
        assert_eq!(hot.len(), 2);
        assert_eq!(hot[0].id, "cat-soup");
        assert_eq!(hot[1].id, "cat-grill");
    }

    #[test]
    fn test_unmatched_parent_yields_empty() {
        let all = vec![category("cat-soup", "grp-hot")];
        assert!(ClassificationResolver::categories_of("grp-none", &all).is_empty());

        let subs = vec![sub_category("sub-cream", "cat-soup")];
        assert!(ClassificationResolver::sub_categories_of("cat-none", &subs).is_empty());
    }

    #[test]
    fn test_cascade_clears_descendants_on_group_change() {
        let (cat, sub) = ClassificationResolver::cascade_on_group_change(
            Some("grp-hot"),
            Some("grp-cold"),
            Some("cat-soup".to_string()),
            Some("sub-cream".to_string()),
        );
        assert_eq!(cat, None);
        assert_eq!(sub, None);
    }

    #[test]
    fn test_cascade_keeps_descendants_when_unchanged() {
        let (cat, sub) = ClassificationResolver::cascade_on_group_change(
            Some("grp-hot"),
            Some("grp-hot"),
            Some("cat-soup".to_string()),
            Some("sub-cream".to_string()),
        );
        assert_eq!(cat.as_deref(), Some("cat-soup"));
        assert_eq!(sub.as_deref(), Some("sub-cream"));
    }

    #[test]
    fn test_cascade_on_category_change() {
        let sub = ClassificationResolver::cascade_on_category_change(
            Some("cat-soup"),
            Some("cat-grill"),
            Some("sub-cream".to_string()),
        );
        assert_eq!(sub, None);
    }
}
