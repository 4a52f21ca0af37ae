// ==========================================
// 餐饮后厨管理系统 - 操作日志领域模型
// ==========================================
// 红线: 所有写入操作必须记录
// 用途: 审计追踪
// 对齐: action_log 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub id: String,
    pub organization_id: String,
    pub action_type: ActionType,
    pub entity_id: String,          // 受影响实体(配方/媒体) id
    pub operator: String,           // 操作人
    pub detail: Option<JsonValue>,  // 操作参数 (JSON)
    pub created_at: DateTime<Utc>,
}

impl ActionLog {
    pub fn new(
        organization_id: &str,
        action_type: ActionType,
        entity_id: &str,
        operator: &str,
        detail: Option<JsonValue>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            action_type,
            entity_id: entity_id.to_string(),
            operator: operator.to_string(),
            detail,
            created_at: Utc::now(),
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    CreateRecipe,    // 创建配方
    UpdateRecipe,    // 更新配方
    DeleteRecipe,    // 删除配方
    SaveVersion,     // 保存版本
    ApproveVersion,  // 审批版本
    UploadMedia,     // 上传媒体
    DeleteMedia,     // 删除媒体
    SetPrimaryMedia, // 设置主媒体
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreateRecipe => "CREATE_RECIPE",
            ActionType::UpdateRecipe => "UPDATE_RECIPE",
            ActionType::DeleteRecipe => "DELETE_RECIPE",
            ActionType::SaveVersion => "SAVE_VERSION",
            ActionType::ApproveVersion => "APPROVE_VERSION",
            ActionType::UploadMedia => "UPLOAD_MEDIA",
            ActionType::DeleteMedia => "DELETE_MEDIA",
            ActionType::SetPrimaryMedia => "SET_PRIMARY_MEDIA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE_RECIPE" => Some(ActionType::CreateRecipe),
            "UPDATE_RECIPE" => Some(ActionType::UpdateRecipe),
            "DELETE_RECIPE" => Some(ActionType::DeleteRecipe),
            "SAVE_VERSION" => Some(ActionType::SaveVersion),
            "APPROVE_VERSION" => Some(ActionType::ApproveVersion),
            "UPLOAD_MEDIA" => Some(ActionType::UploadMedia),
            "DELETE_MEDIA" => Some(ActionType::DeleteMedia),
            "SET_PRIMARY_MEDIA" => Some(ActionType::SetPrimaryMedia),
            _ => None,
        }
    }
}
