mod admin;
mod base;
mod notification;
mod settings;
mod status;

use admin::AdminClient;
pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use notification::NotificationClient;
pub use notification::SendNotificationInput;
use settings::SettingsClient;
use status::StatusClient;
pub use status::Metrics;
use std::sync::Arc;

pub use nettu_notifier_api_structs::dtos::*;
pub use nettu_notifier_domain::{Metadata, NotificationKind};
pub use reqwest::StatusCode;

pub use nettu_notifier_api_structs::dtos::NotificationDTO as Notification;
pub use nettu_notifier_api_structs::dtos::NotificationSettingsDTO as NotificationSettings;

/// Nettu Notifier Server SDK
///
/// The SDK contains methods for interacting with the Nettu Notifier server
/// API.
#[derive(Clone)]
pub struct NettuNotifierSDK {
    pub admin: AdminClient,
    pub notification: NotificationClient,
    pub settings: SettingsClient,
    pub status: StatusClient,
}

impl NettuNotifierSDK {
    pub fn new(address: String) -> Self {
        Self::from_base(BaseClient::new(address))
    }

    /// Client that is allowed to call the admin routes
    pub fn new_admin<T: Into<String>>(address: String, admin_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_admin_key(admin_key.into());
        Self::from_base(base)
    }

    fn from_base(base: BaseClient) -> Self {
        let base = Arc::new(base);
        let admin = AdminClient::new(base.clone());
        let notification = NotificationClient::new(base.clone());
        let settings = SettingsClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            admin,
            notification,
            settings,
            status,
        }
    }
}
