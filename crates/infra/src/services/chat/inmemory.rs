use super::{DeliveryError, IDeliveryAdapter};
use nettu_notifier_domain::NotificationMessage;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

/// Delivery adapter that records every notification instead of posting it
#[derive(Default)]
pub struct InMemoryDeliveryAdapter {
    ready: AtomicBool,
    unreachable: AtomicBool,
    failing: AtomicBool,
    sent: Mutex<Vec<NotificationMessage>>,
}

impl InMemoryDeliveryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Makes the connect handshake fail as if the chat platform was down
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Makes every following send fail as if the chat platform was down
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IDeliveryAdapter for InMemoryDeliveryAdapter {
    async fn connect(&self) -> Result<(), DeliveryError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(DeliveryError::Transport("Connection refused".into()));
        }
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn send(&self, notification: &NotificationMessage) -> Result<(), DeliveryError> {
        if !self.is_ready() {
            return Err(DeliveryError::NotReady);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Transport("Connection reset by peer".into()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn stop(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }
}
