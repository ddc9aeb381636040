use crate::shared::metadata::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOGIN_ACTIVITY: &str = "login";

/// Activity of a user reported by the origin system, e.g. a login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub user_id: String,
    pub activity_type: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl UserActivity {
    pub fn is_login(&self) -> bool {
        self.activity_type.eq_ignore_ascii_case(LOGIN_ACTIVITY)
    }
}
