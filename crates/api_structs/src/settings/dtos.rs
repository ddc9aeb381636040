use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Notification preferences of an owner. The pipeline stores nothing, so the
/// content is opaque here.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsDTO {
    pub owner_id: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
}
