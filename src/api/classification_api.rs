// ==========================================
// 餐饮后厨管理系统 - 分类 API
// ==========================================
// 职责: 分类层级的级联下拉读取与维护
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::domain::classification::{Category, MajorGroup, SubCategory};
use crate::engine::classification::ClassificationResolver;
use crate::repository::classification_repo::ClassificationRepository;

// ==========================================
// ClassificationApi - 分类 API
// ==========================================

/// 分类 API
///
/// 职责：
/// 1. 大类/品类/子类查询(级联过滤)
/// 2. 分类参考数据维护
pub struct ClassificationApi {
    classification_repo: Arc<ClassificationRepository>,
}

impl ClassificationApi {
    /// 创建新的 ClassificationApi 实例
    pub fn new(classification_repo: Arc<ClassificationRepository>) -> Self {
        Self {
            classification_repo,
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 组织下全部大类
    pub fn list_major_groups(&self, organization_id: &str) -> ApiResult<Vec<MajorGroup>> {
        Ok(self.classification_repo.list_major_groups(organization_id)?)
    }

    /// 某大类下的品类(级联过滤)
    pub fn list_categories_of(
        &self,
        organization_id: &str,
        group_id: &str,
    ) -> ApiResult<Vec<Category>> {
        debug!(organization_id, group_id, "查询大类下品类");
        let all = self.classification_repo.list_categories(organization_id)?;
        Ok(ClassificationResolver::categories_of(group_id, &all)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 某品类下的子类(级联过滤)
    pub fn list_sub_categories_of(
        &self,
        organization_id: &str,
        category_id: &str,
    ) -> ApiResult<Vec<SubCategory>> {
        debug!(organization_id, category_id, "查询品类下子类");
        let all = self
            .classification_repo
            .list_sub_categories(organization_id)?;
        Ok(ClassificationResolver::sub_categories_of(category_id, &all)
            .into_iter()
            .cloned()
            .collect())
    }

    // ==========================================
    // 维护接口
    // ==========================================

    pub fn create_major_group(
        &self,
        organization_id: &str,
        name: &str,
    ) -> ApiResult<MajorGroup> {
        let group = MajorGroup {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.classification_repo.insert_major_group(&group)?;
        Ok(group)
    }

    pub fn create_category(
        &self,
        organization_id: &str,
        group_id: &str,
        name: &str,
    ) -> ApiResult<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            group_id: group_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.classification_repo.insert_category(&category)?;
        Ok(category)
    }

    pub fn create_sub_category(
        &self,
        organization_id: &str,
        category_id: &str,
        name: &str,
    ) -> ApiResult<SubCategory> {
        let sub_category = SubCategory {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            category_id: category_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.classification_repo.insert_sub_category(&sub_category)?;
        Ok(sub_category)
    }
}
