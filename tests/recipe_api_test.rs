// ==========================================
// 配方 API 集成测试
// ==========================================
// 测试目标: 创建/补丁更新/删除/过滤/版本流程与成本同步
// ==========================================


use std::sync::Arc;

use kitchen_boh::api::{ApiError, RecipeApi};
use kitchen_boh::config::ConfigManager;
use kitchen_boh::domain::allergen::Allergen;
use kitchen_boh::domain::patch::{RecipePatch, YieldPatch};
use kitchen_boh::domain::recipe::Recipe;
use kitchen_boh::domain::types::RecipeType;
use kitchen_boh::engine::AllergenReconciler;
use kitchen_boh::repository::{ActionLogRepository, RecipeRepository};

fn create_api(db_path: &str) -> RecipeApi {
    let recipe_repo = Arc::new(RecipeRepository::new(db_path).expect("创建配方仓储失败"));
    let action_log_repo = Arc::new(ActionLogRepository::new(db_path).expect("创建日志仓储失败"));
    let config = Arc::new(ConfigManager::new(db_path).expect("创建配置管理器失败"));
    RecipeApi::new(recipe_repo, action_log_repo, config)
}

// ==========================================
// 创建
// ==========================================

#[test]
fn test_create_recipe_computes_costs_and_audit() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);

    let draft = test_helpers::sample_recipe("ignored", "罗宋汤");
    let created = api
        .create_recipe("org-1", draft, "chef-zhang")
        .expect("创建配方失败");

    assert_eq!(created.organization_id, "org-1");
    assert_eq!(created.total_cost, 15.0);
    assert_eq!(created.cost_per_unit, 3.0);
    assert_eq!(created.created_by, "chef-zhang");
    assert_eq!(created.modified_by, "chef-zhang");
    assert_eq!(created.version, "1.0");

    // 操作日志已落库
    let log_repo = ActionLogRepository::new(&db_path).expect("创建日志仓储失败");
    let logs = log_repo
        .list_by_organization("org-1", 10)
        .expect("日志查询失败");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].entity_id, created.id);
}

#[test]
fn test_create_applies_config_defaults() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let config = ConfigManager::new(&db_path).expect("创建配置管理器失败");
    config
        .set_config_value("costing/default_labor_cost_per_hour", "24.0")
        .expect("写配置失败");

    let api = create_api(&db_path);
    let mut draft = Recipe::new("org-1", "白灼菜心", RecipeType::Final);
    draft.yield_info.amount = 2.0;
    draft.recipe_unit_ratio = "2".to_string();
    draft.prep_time = 5;
    draft.cook_time = 5;

    let created = api
        .create_recipe("org-1", draft, "chef-li")
        .expect("创建配方失败");
    // 未填写时薪 → 取配置默认值 24.0,人工成本 = 10/60 × 24 = 4
    assert_eq!(created.labor_cost_per_hour, 24.0);
    assert_eq!(created.total_cost, 4.0);
}

#[test]
fn test_create_rejects_blank_name() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);

    let draft = Recipe::new("org-1", "  ", RecipeType::Final);
    assert!(matches!(
        api.create_recipe("org-1", draft, "chef"),
        Err(ApiError::ValidationError { field, .. }) if field == "name"
    ));
}

// ==========================================
// 补丁更新
// ==========================================

#[test]
fn test_update_resyncs_costs() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);
    let created = api
        .create_recipe("org-1", test_helpers::sample_recipe("x", "罗宋汤"), "chef")
        .expect("创建配方失败");

    // 产量 5 → 3,其余不变: 总成本 15 不变,单位成本 15/3 = 5
    let patch = RecipePatch {
        yield_patch: Some(YieldPatch {
            amount: Some(3.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    let updated = api
        .update_recipe("org-1", &created.id, &patch, "chef-wang")
        .expect("更新失败");

    assert_eq!(updated.total_cost, 15.0);
    assert_eq!(updated.cost_per_unit, 5.0);
    assert_eq!(updated.modified_by, "chef-wang");
    assert_eq!(
        updated.total_cost,
        updated.ingredient_cost + (30.0 / 60.0) * 18.0
    );

    // 派生字段已持久化
    let reloaded = api.get_recipe("org-1", &created.id).expect("查询失败");
    assert_eq!(reloaded.cost_per_unit, 5.0);
}

#[test]
fn test_update_rejects_invalid_yield() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);
    let created = api
        .create_recipe("org-1", test_helpers::sample_recipe("x", "罗宋汤"), "chef")
        .expect("创建配方失败");

    let patch = RecipePatch {
        yield_patch: Some(YieldPatch {
            amount: Some(-1.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(api.update_recipe("org-1", &created.id, &patch, "chef").is_err());

    // 失败后库内状态不变
    let reloaded = api.get_recipe("org-1", &created.id).expect("查询失败");
    assert_eq!(reloaded.yield_info.amount, 5.0);
}

#[test]
fn test_update_unparsable_ratio_fails_fast() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);
    let created = api
        .create_recipe("org-1", test_helpers::sample_recipe("x", "罗宋汤"), "chef")
        .expect("创建配方失败");

    let patch = RecipePatch {
        recipe_unit_ratio: Some("好多份".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        api.update_recipe("org-1", &created.id, &patch, "chef"),
        Err(ApiError::ValidationError { field, .. }) if field == "recipe_unit_ratio"
    ));
}

#[test]
fn test_update_allergen_info_via_reconciler() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);
    let created = api
        .create_recipe("org-1", test_helpers::sample_recipe("x", "花生酱拌面"), "chef")
        .expect("创建配方失败");

    // 先标记 可能含有 花生,再标记 含有 → 集合迁移后整体替换写回
    let step1 = AllergenReconciler::toggle_cross_contact(
        &created.allergen_info,
        Allergen::Peanut,
        true,
    );
    let step2 = AllergenReconciler::toggle_contains(&step1, Allergen::Peanut, true);

    let patch = RecipePatch {
        allergen_info: Some(step2),
        ..Default::default()
    };
    let updated = api
        .update_recipe("org-1", &created.id, &patch, "chef")
        .expect("更新失败");

    assert!(updated.allergen_info.contains.contains(&Allergen::Peanut));
    assert!(updated.allergen_info.may_contain.is_empty());
    // 标记 含有 时同时从 交叉接触风险 移除
    assert!(!updated.allergen_info.cross_contact_risk.contains(&Allergen::Peanut));
}

#[test]
fn test_update_missing_recipe_is_not_found() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);
    assert!(matches!(
        api.update_recipe("org-1", "no-such-id", &RecipePatch::default(), "chef"),
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// 过滤与删除
// ==========================================

#[test]
fn test_filter_by_type_and_search_term() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);

    let mut soup = test_helpers::sample_recipe("x", "Borscht Soup");
    soup.recipe_type = RecipeType::Final;
    api.create_recipe("org-1", soup, "chef").expect("创建失败");

    let mut stock = test_helpers::sample_recipe("x", "Beef Stock");
    stock.recipe_type = RecipeType::Prepared;
    stock.station = "汤档".to_string();
    api.create_recipe("org-1", stock, "chef").expect("创建失败");

    // 类型过滤
    let finals = api
        .filter_recipes("org-1", RecipeType::Final, "")
        .expect("过滤失败");
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0].name, "Borscht Soup");

    // 关键词大小写不敏感
    let hits = api
        .filter_recipes("org-1", RecipeType::Prepared, "BEEF")
        .expect("过滤失败");
    assert_eq!(hits.len(), 1);

    // 工位也参与匹配
    let by_station = api
        .filter_recipes("org-1", RecipeType::Prepared, "汤档")
        .expect("过滤失败");
    assert_eq!(by_station.len(), 1);

    let none = api
        .filter_recipes("org-1", RecipeType::Final, "不存在")
        .expect("过滤失败");
    assert!(none.is_empty());
}

#[test]
fn test_delete_recipe() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);
    let created = api
        .create_recipe("org-1", test_helpers::sample_recipe("x", "罗宋汤"), "chef")
        .expect("创建配方失败");

    api.delete_recipe("org-1", &created.id, "chef").expect("删除失败");
    assert!(matches!(
        api.get_recipe("org-1", &created.id),
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// 版本管理
// ==========================================

#[test]
fn test_save_and_approve_version() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let api = create_api(&db_path);
    let created = api
        .create_recipe("org-1", test_helpers::sample_recipe("x", "罗宋汤"), "chef")
        .expect("创建配方失败");

    let saved = api
        .save_version(
            "org-1",
            &created.id,
            vec!["调整炖煮时间".to_string()],
            "chef-zhang",
        )
        .expect("保存版本失败");
    assert_eq!(saved.version, "1.1");
    assert_eq!(saved.versions.len(), 1);
    assert_eq!(saved.versions[0].created_by, "chef-zhang");
    assert!(saved.versions[0].approved.is_none());

    let version_id = saved.versions[0].id.clone();
    let approved = api
        .approve_version(
            "org-1",
            &created.id,
            &version_id,
            "manager-liu",
            Some("通过".to_string()),
        )
        .expect("审批版本失败");
    let approval = approved.versions[0].approved.as_ref().expect("应已审批");
    assert_eq!(approval.by, "manager-liu");
    assert_eq!(approval.notes.as_deref(), Some("通过"));
}
