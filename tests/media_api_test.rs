// ==========================================
// 媒体 API 集成测试
// ==========================================
// 测试目标: 上传 → URL 挂载 → 主媒体 → 删除 的完整链路
// ==========================================


use std::sync::Arc;

use kitchen_boh::api::{ApiError, MediaApi, MediaDetailsPatch, RecipeApi};
use kitchen_boh::config::ConfigManager;
use kitchen_boh::domain::recipe::Recipe;
use kitchen_boh::domain::types::MediaKind;
use kitchen_boh::repository::{ActionLogRepository, RecipeRepository};
use kitchen_boh::storage::LocalMediaStorage;
use tempfile::TempDir;

fn create_apis(db_path: &str, media_root: &TempDir) -> (RecipeApi, MediaApi) {
    let recipe_repo = Arc::new(RecipeRepository::new(db_path).expect("创建配方仓储失败"));
    let action_log_repo = Arc::new(ActionLogRepository::new(db_path).expect("创建日志仓储失败"));
    let config = Arc::new(ConfigManager::new(db_path).expect("创建配置管理器失败"));
    let storage = Arc::new(LocalMediaStorage::new(media_root.path()));

    let recipe_api = RecipeApi::new(recipe_repo.clone(), action_log_repo.clone(), config);
    let media_api = MediaApi::new(recipe_repo, action_log_repo, storage);
    (recipe_api, media_api)
}

fn create_recipe(recipe_api: &RecipeApi) -> Recipe {
    recipe_api
        .create_recipe("org-1", test_helpers::sample_recipe("x", "罗宋汤"), "chef")
        .expect("创建配方失败")
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_upload_first_media_becomes_primary() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let media_root = TempDir::new().expect("创建媒体目录失败");
    let (recipe_api, media_api) = create_apis(&db_path, &media_root);
    let recipe = create_recipe(&recipe_api);

    let updated = media_api
        .upload_media("org-1", &recipe.id, "成品图.jpg", b"jpeg-bytes", "chef")
        .await
        .expect("上传失败");

    assert_eq!(updated.media.len(), 1);
    let media = &updated.media[0];
    assert!(media.is_primary);
    assert_eq!(media.kind, MediaKind::Image);
    assert!(media.url.starts_with("/media/org-1/recipes/"));
    assert_eq!(media.title.as_deref(), Some("成品图.jpg"));

    // 对象确实写入了本地存储
    let reloaded = recipe_api.get_recipe("org-1", &recipe.id).expect("查询失败");
    assert_eq!(reloaded.media.len(), 1);
}

#[tokio::test]
async fn test_upload_video_kind_inferred() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let media_root = TempDir::new().expect("创建媒体目录失败");
    let (recipe_api, media_api) = create_apis(&db_path, &media_root);
    let recipe = create_recipe(&recipe_api);

    let updated = media_api
        .upload_media("org-1", &recipe.id, "炖煮过程.mp4", b"mp4-bytes", "chef")
        .await
        .expect("上传失败");
    assert_eq!(updated.media[0].kind, MediaKind::Video);
}

#[tokio::test]
async fn test_upload_many_concurrent() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let media_root = TempDir::new().expect("创建媒体目录失败");
    let (recipe_api, media_api) = create_apis(&db_path, &media_root);
    let recipe = create_recipe(&recipe_api);

    let files = vec![
        ("a.jpg".to_string(), b"a".to_vec()),
        ("b.jpg".to_string(), b"b".to_vec()),
        ("c.mp4".to_string(), b"c".to_vec()),
    ];
    let updated = media_api
        .upload_many("org-1", &recipe.id, files, "chef")
        .await
        .expect("批量上传失败");

    assert_eq!(updated.media.len(), 3);
    // 仅首个媒体为主媒体
    assert_eq!(updated.media.iter().filter(|m| m.is_primary).count(), 1);
    assert!(updated.media[0].is_primary);
}

#[tokio::test]
async fn test_set_primary_clears_previous() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let media_root = TempDir::new().expect("创建媒体目录失败");
    let (recipe_api, media_api) = create_apis(&db_path, &media_root);
    let recipe = create_recipe(&recipe_api);

    let updated = media_api
        .upload_many(
            "org-1",
            &recipe.id,
            vec![
                ("a.jpg".to_string(), b"a".to_vec()),
                ("b.jpg".to_string(), b"b".to_vec()),
            ],
            "chef",
        )
        .await
        .expect("批量上传失败");

    let second_id = updated.media[1].id.clone();
    let updated = media_api
        .set_primary_media("org-1", &recipe.id, &second_id, "chef")
        .expect("设置主媒体失败");

    let primary: Vec<&str> = updated
        .media
        .iter()
        .filter(|m| m.is_primary)
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(primary, vec![second_id.as_str()]);
}

#[tokio::test]
async fn test_delete_media_removes_record_and_object() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let media_root = TempDir::new().expect("创建媒体目录失败");
    let (recipe_api, media_api) = create_apis(&db_path, &media_root);
    let recipe = create_recipe(&recipe_api);

    let updated = media_api
        .upload_media("org-1", &recipe.id, "photo.jpg", b"bytes", "chef")
        .await
        .expect("上传失败");
    let media = updated.media[0].clone();

    // 对象文件存在
    let object_rel = media.url.strip_prefix("/media/").expect("URL 前缀应为 /media/");
    assert!(media_root.path().join(object_rel).exists());

    let after = media_api
        .delete_media("org-1", &recipe.id, &media.id, "chef")
        .await
        .expect("删除失败");
    assert!(after.media.is_empty());
    assert!(!media_root.path().join(object_rel).exists());
}

#[tokio::test]
async fn test_delete_missing_media_is_not_found() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let media_root = TempDir::new().expect("创建媒体目录失败");
    let (recipe_api, media_api) = create_apis(&db_path, &media_root);
    let recipe = create_recipe(&recipe_api);

    assert!(matches!(
        media_api
            .delete_media("org-1", &recipe.id, "media-none", "chef")
            .await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_media_details() {
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");
    let media_root = TempDir::new().expect("创建媒体目录失败");
    let (recipe_api, media_api) = create_apis(&db_path, &media_root);
    let recipe = create_recipe(&recipe_api);

    let updated = media_api
        .upload_media("org-1", &recipe.id, "photo.jpg", b"bytes", "chef")
        .await
        .expect("上传失败");
    let media_id = updated.media[0].id.clone();

    let patch = MediaDetailsPatch {
        title: Some(Some("摆盘参考".to_string())),
        description: Some(Some("出品对照图".to_string())),
        tags: Some(vec!["出品".to_string(), "摆盘".to_string()]),
        ..Default::default()
    };
    let updated = media_api
        .update_media_details("org-1", &recipe.id, &media_id, &patch, "chef")
        .expect("更新明细失败");

    let media = &updated.media[0];
    assert_eq!(media.title.as_deref(), Some("摆盘参考"));
    assert_eq!(media.description.as_deref(), Some("出品对照图"));
    assert_eq!(media.tags.len(), 2);
    // 未触及字段保持不变
    assert!(media.is_primary);
}
