use crate::dtos::NotificationSettingsDTO;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsResponse {
    pub settings: NotificationSettingsDTO,
}

pub mod get_settings {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub owner_id: String,
    }

    pub type APIResponse = NotificationSettingsResponse;
}

pub mod update_settings {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub owner_id: String,
    }

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub settings: Map<String, Value>,
    }

    pub type APIResponse = NotificationSettingsResponse;
}
