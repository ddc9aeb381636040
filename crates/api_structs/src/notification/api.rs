use crate::dtos::NotificationDTO;
use nettu_notifier_domain::{Metadata, NotificationMessage};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub notification: NotificationDTO,
}

impl NotificationResponse {
    pub fn new(notification: NotificationMessage) -> Self {
        Self {
            notification: NotificationDTO::new(notification),
        }
    }
}

pub mod send_notification {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub owner_id: String,
        pub message: String,
        #[serde(default)]
        pub metadata: Option<Metadata>,
    }

    pub type APIResponse = NotificationResponse;
}
