use chrono::{DateTime, Utc};
use nettu_notifier_domain::{Metadata, NotificationKind, NotificationMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDTO {
    pub kind: NotificationKind,
    pub owner_id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    pub emitted_at: DateTime<Utc>,
}

impl NotificationDTO {
    pub fn new(notification: NotificationMessage) -> Self {
        Self {
            kind: notification.kind(),
            owner_id: notification.owner_id().to_string(),
            text: notification.text().to_string(),
            metadata: notification.metadata().cloned(),
            emitted_at: notification.emitted_at(),
        }
    }
}
