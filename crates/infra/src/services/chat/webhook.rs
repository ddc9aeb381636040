use super::{ChatMessage, DeliveryError, IDeliveryAdapter};
use nettu_notifier_domain::NotificationMessage;
use reqwest::{Client, StatusCode};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tracing::{error, info};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts notifications to a chat channel through its incoming webhook
pub struct WebhookChatClient {
    client: Client,
    webhook_url: Url,
    ready: AtomicBool,
}

impl WebhookChatClient {
    pub fn new(webhook_url: Url) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
            ready: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl IDeliveryAdapter for WebhookChatClient {
    async fn connect(&self) -> Result<(), DeliveryError> {
        let res = self
            .client
            .get(self.webhook_url.clone())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Chat webhook handshake failed. Error message: {:?}", e);
                DeliveryError::Transport(e.to_string())
            })?;

        let status = res.status();
        // Slack answers GET requests on a webhook with a client error, an
        // unknown or revoked webhook is what matters here
        if status.is_server_error()
            || status == StatusCode::NOT_FOUND
            || status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
        {
            let body = res.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        self.ready.store(true, Ordering::SeqCst);
        info!(host = ?self.webhook_url.host_str(), "Chat client is ready");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn send(&self, notification: &NotificationMessage) -> Result<(), DeliveryError> {
        if !self.is_ready() {
            return Err(DeliveryError::NotReady);
        }
        let message = ChatMessage::from(notification);
        let res = self
            .client
            .post(self.webhook_url.clone())
            .timeout(REQUEST_TIMEOUT)
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Chat webhook POST error. Error message: {:?}", e);
                DeliveryError::Transport(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(
                "[Unexpected Response] Chat webhook POST error. Status: {}, body: {}",
                status, body
            );
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn stop(&self) {
        if self.ready.swap(false, Ordering::SeqCst) {
            info!("Chat client stopped");
        }
    }
}
