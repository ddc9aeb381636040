use crate::notification::publish_notification;
use crate::shared::usecase::UseCase;
use nettu_notifier_domain::{NotificationMessage, ReminderJob};
use nettu_notifier_infra::{BrokerError, NotifierContext};

/// Publishes the `EventReminder` notification of a due `ReminderJob` and
/// removes the job from the store.
#[derive(Debug)]
pub struct FireReminderUseCase {
    pub reminder: ReminderJob,
}

#[derive(Debug)]
pub enum UseCaseError {
    Publish(BrokerError),
    StorageError,
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Publish(e) => write!(f, "{}", e),
            Self::StorageError => write!(f, "Unable to remove the reminder from the store"),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for FireReminderUseCase {
    type Response = NotificationMessage;

    type Error = UseCaseError;

    const NAME: &'static str = "FireReminder";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let notification = self.reminder.clone().into_notification(ctx.sys.now());
        let published = publish_notification(&notification, ctx).await;

        // Removed whatever the publish outcome, a reminder is attempted once
        let deleted = ctx
            .repos
            .reminder_repo
            .delete(&self.reminder.event.id, self.reminder.fire_at)
            .await;

        published.map_err(UseCaseError::Publish)?;
        deleted.map_err(|_| UseCaseError::StorageError)?;
        Ok(notification)
    }
}
