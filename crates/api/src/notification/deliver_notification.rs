use crate::shared::usecase::UseCase;
use nettu_notifier_domain::NotificationMessage;
use nettu_notifier_infra::{DeliveryError, NotifierContext};

/// Hands a notification from the outbound topic over to the chat platform.
/// Failed deliveries are not retried.
#[derive(Debug)]
pub struct DeliverNotificationUseCase {
    pub notification: NotificationMessage,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverNotificationUseCase {
    type Response = ();

    type Error = DeliveryError;

    const NAME: &'static str = "DeliverNotification";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        ctx.delivery.send(&self.notification).await?;
        ctx.stats.notification_sent();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::{test_context::setup, usecase::execute};
    use nettu_notifier_domain::Metadata;

    fn notification() -> NotificationMessage {
        NotificationMessage::custom(
            "user_1".into(),
            "hello".into(),
            Metadata::new(),
            chrono::Utc::now(),
        )
    }

    #[actix_web::main]
    #[test]
    async fn counts_delivered_notifications() {
        let test = setup();
        test.ctx.delivery.connect().await.unwrap();

        let usecase = DeliverNotificationUseCase {
            notification: notification(),
        };
        assert!(execute(usecase, &test.ctx).await.is_ok());
        assert_eq!(test.delivery.sent().len(), 1);
        assert_eq!(test.ctx.stats.snapshot().notifications_sent, 1);
    }

    #[actix_web::main]
    #[test]
    async fn not_ready_adapter_fails_without_counting() {
        let test = setup();

        let usecase = DeliverNotificationUseCase {
            notification: notification(),
        };
        let res = execute(usecase, &test.ctx).await;
        assert!(matches!(res, Err(DeliveryError::NotReady)));
        assert!(test.delivery.sent().is_empty());
        assert_eq!(test.ctx.stats.snapshot().notifications_sent, 0);
    }
}
