// ==========================================
// 配置管理器集成测试
// ==========================================
// 测试目标: config_kv 默认值与覆写
// ==========================================


use kitchen_boh::config::{config_keys, ConfigManager};

#[test]
fn test_defaults_without_rows() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let config = ConfigManager::new(&db_path).expect("创建配置管理器失败");

    assert_eq!(config.get_default_labor_cost_per_hour().unwrap(), 18.0);
    assert_eq!(config.get_default_target_cost_percent().unwrap(), 30.0);
    assert_eq!(config.get_currency_code().unwrap(), "USD");
    assert_eq!(config.get_locale().unwrap(), "zh-CN");
}

#[test]
fn test_override_and_reread() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let config = ConfigManager::new(&db_path).expect("创建配置管理器失败");

    config
        .set_config_value(config_keys::DEFAULT_LABOR_COST_PER_HOUR, "22.5")
        .expect("写配置失败");
    config
        .set_config_value(config_keys::CURRENCY_CODE, "CNY")
        .expect("写配置失败");

    assert_eq!(config.get_default_labor_cost_per_hour().unwrap(), 22.5);
    assert_eq!(config.get_currency_code().unwrap(), "CNY");

    // UPSERT 覆写
    config
        .set_config_value(config_keys::CURRENCY_CODE, "EUR")
        .expect("写配置失败");
    assert_eq!(config.get_currency_code().unwrap(), "EUR");
}

#[test]
fn test_malformed_number_falls_back() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let config = ConfigManager::new(&db_path).expect("创建配置管理器失败");

    config
        .set_config_value(config_keys::DEFAULT_LABOR_COST_PER_HOUR, "not-a-number")
        .expect("写配置失败");
    assert_eq!(config.get_default_labor_cost_per_hour().unwrap(), 18.0);
}
