use crate::{APIResponse, BaseClient};
use nettu_notifier_api_structs::*;
use nettu_notifier_domain::Metadata;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationClient {
    base: Arc<BaseClient>,
}

pub struct SendNotificationInput {
    pub owner_id: String,
    pub message: String,
    pub metadata: Option<Metadata>,
}

impl NotificationClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn send(
        &self,
        input: SendNotificationInput,
    ) -> APIResponse<send_notification::APIResponse> {
        let body = send_notification::RequestBody {
            owner_id: input.owner_id,
            message: input.message,
            metadata: input.metadata,
        };
        self.base
            .post(body, "notify".into(), StatusCode::CREATED)
            .await
    }
}
