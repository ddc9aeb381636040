use super::{
    deliver_notification::DeliverNotificationUseCase,
    process_calendar_event::{self, ProcessCalendarEventUseCase},
    process_user_activity::ProcessUserActivityUseCase,
};
use crate::shared::usecase::execute;
use nettu_notifier_domain::{CalendarEvent, NotificationMessage, Topic, UserActivity};
use nettu_notifier_infra::{BrokerError, DeliveryError, InboundMessage, NotifierContext};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),
    #[error(transparent)]
    Publish(#[from] BrokerError),
    #[error("Unable to store reminder")]
    Storage,
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl From<process_calendar_event::UseCaseError> for HandlerError {
    fn from(e: process_calendar_event::UseCaseError) -> Self {
        match e {
            process_calendar_event::UseCaseError::Publish(e) => Self::Publish(e),
            process_calendar_event::UseCaseError::StorageError => Self::Storage,
        }
    }
}

fn parse<T: DeserializeOwned>(message: &InboundMessage) -> Result<T, HandlerError> {
    serde_json::from_slice(&message.payload)
        .map_err(|e| HandlerError::MalformedMessage(e.to_string()))
}

/// Decides what happens with a message based on the topic it was read from
pub struct NotificationRouter;

impl NotificationRouter {
    pub async fn route(
        topic: Topic,
        message: &InboundMessage,
        ctx: &NotifierContext,
    ) -> Result<(), HandlerError> {
        match topic {
            Topic::CalendarEvents => Self::on_calendar_event(parse(message)?, ctx).await,
            Topic::OutboundNotifications => {
                Self::on_outbound_notification(parse(message)?, ctx).await
            }
            Topic::UserActivities => Self::on_activity_event(parse(message)?, ctx).await,
            Topic::EmailNotifications => {
                let payload: serde_json::Value = parse(message)?;
                info!(offset = message.offset, payload = %payload, "Received email notification");
                Ok(())
            }
            Topic::PushNotifications => {
                let payload: serde_json::Value = parse(message)?;
                info!(offset = message.offset, payload = %payload, "Received push notification");
                Ok(())
            }
        }
    }

    async fn on_calendar_event(
        event: CalendarEvent,
        ctx: &NotifierContext,
    ) -> Result<(), HandlerError> {
        let usecase = ProcessCalendarEventUseCase { event };
        execute(usecase, ctx).await?;
        Ok(())
    }

    async fn on_outbound_notification(
        notification: NotificationMessage,
        ctx: &NotifierContext,
    ) -> Result<(), HandlerError> {
        let usecase = DeliverNotificationUseCase { notification };
        execute(usecase, ctx).await?;
        Ok(())
    }

    async fn on_activity_event(
        activity: UserActivity,
        ctx: &NotifierContext,
    ) -> Result<(), HandlerError> {
        let usecase = ProcessUserActivityUseCase { activity };
        execute(usecase, ctx).await?;
        Ok(())
    }
}
