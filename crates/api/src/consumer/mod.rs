use crate::notification::{HandlerError, NotificationRouter};
use actix_web::rt::time::sleep;
use futures::FutureExt;
use nettu_notifier_domain::Topic;
use nettu_notifier_infra::{BrokerError, InboundMessage, NotifierContext, TopicsConfig};
use std::{any::Any, collections::HashMap, panic::AssertUnwindSafe, time::Duration};
use tracing::{error, info, warn};

const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_millis(500);

/// Resolves the topic names observed on the broker to the known `Topic`s.
/// Built once at startup from the configured names.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
    topics: HashMap<String, Topic>,
}

impl HandlerRegistry {
    pub fn new(config: &TopicsConfig) -> Self {
        let topics = Topic::ALL
            .iter()
            .map(|topic| (config.name(*topic).to_string(), *topic))
            .collect();
        Self { topics }
    }

    pub fn resolve(&self, topic_name: &str) -> Option<Topic> {
        self.topics.get(topic_name).copied()
    }

    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.topics.keys().cloned().collect();
        names.sort();
        names
    }
}

#[derive(Debug, PartialEq)]
pub enum DispatchOutcome {
    Handled,
    /// No handler for the topic
    Dropped,
    Failed,
    Panicked,
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown panic payload".into()
    }
}

/// Runs the handler of the message topic. Errors and panics of the handler
/// are logged and counted, they never reach the caller.
pub async fn dispatch(
    registry: &HandlerRegistry,
    message: &InboundMessage,
    ctx: &NotifierContext,
) -> DispatchOutcome {
    let topic = match registry.resolve(&message.topic) {
        Some(topic) => topic,
        None => {
            info!(
                topic = %message.topic,
                partition = message.partition,
                offset = message.offset,
                "No handler registered for topic, dropping message"
            );
            return DispatchOutcome::Dropped;
        }
    };

    match AssertUnwindSafe(NotificationRouter::route(topic, message, ctx))
        .catch_unwind()
        .await
    {
        Ok(Ok(())) => DispatchOutcome::Handled,
        Ok(Err(e)) => {
            ctx.stats.error();
            match e {
                HandlerError::MalformedMessage(_) => warn!(
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    error = %e,
                    "Dropping malformed message"
                ),
                _ => error!(
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    error = %e,
                    "Handler failed"
                ),
            }
            DispatchOutcome::Failed
        }
        Err(panic) => {
            ctx.stats.error();
            error!(
                topic = %message.topic,
                partition = message.partition,
                offset = message.offset,
                panic = %panic_message(&panic),
                "Handler panicked"
            );
            DispatchOutcome::Panicked
        }
    }
}

/// Pulls messages one at a time and awaits their handler before pulling the
/// next one. Returns once the consumer is disconnected.
pub async fn run_consumer_loop(registry: HandlerRegistry, ctx: NotifierContext) {
    info!(topics = ?registry.topic_names(), "Consumer loop started");
    loop {
        let message = match ctx.broker.consumer.recv().await {
            Ok(message) => message,
            Err(BrokerError::Disconnected) => {
                info!("Consumer disconnected, stopping consumer loop");
                break;
            }
            Err(e) => {
                error!(error = %e, "Unable to receive message");
                sleep(RECEIVE_ERROR_BACKOFF).await;
                continue;
            }
        };

        dispatch(&registry, &message, &ctx).await;

        if let Err(e) = ctx.broker.consumer.ack(&message) {
            warn!(
                topic = %message.topic,
                partition = message.partition,
                offset = message.offset,
                error = %e,
                "Unable to store offset"
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_context::{event_factory, setup};
    use chrono::Duration as ChronoDuration;
    use nettu_notifier_domain::{CalendarEventKind, NotificationMessage};
    use nettu_notifier_infra::{DeliveryError, IDeliveryAdapter};
    use std::sync::Arc;

    struct PanickingDeliveryAdapter;

    #[async_trait::async_trait]
    impl IDeliveryAdapter for PanickingDeliveryAdapter {
        async fn connect(&self) -> Result<(), DeliveryError> {
            Ok(())
        }

        fn is_ready(&self) -> bool {
            true
        }

        async fn send(&self, _notification: &NotificationMessage) -> Result<(), DeliveryError> {
            panic!("chat client blew up");
        }

        async fn stop(&self) {}
    }

    #[test]
    fn registry_resolves_configured_topics() {
        let mut topics = TopicsConfig::default();
        topics.calendar_events = "prod.calendar-events".into();
        let registry = HandlerRegistry::new(&topics);

        assert_eq!(
            registry.resolve("prod.calendar-events"),
            Some(Topic::CalendarEvents)
        );
        assert_eq!(registry.resolve("calendar-events"), None);
        assert_eq!(
            registry.resolve("outbound-notifications"),
            Some(Topic::OutboundNotifications)
        );
        assert_eq!(registry.topic_names().len(), Topic::ALL.len());
    }

    #[actix_web::main]
    #[test]
    async fn drops_messages_of_unknown_topics() {
        let test = setup();
        let registry = HandlerRegistry::new(&test.ctx.config.topics);
        let message = InboundMessage {
            topic: "unknown".into(),
            partition: 0,
            offset: 0,
            key: None,
            payload: b"{}".to_vec(),
        };
        assert_eq!(
            dispatch(&registry, &message, &test.ctx).await,
            DispatchOutcome::Dropped
        );
        assert_eq!(test.ctx.stats.snapshot().errors, 0);
    }

    #[actix_web::main]
    #[test]
    async fn handler_panic_does_not_stop_dispatching() {
        let mut test = setup();
        test.ctx.delivery = Arc::new(PanickingDeliveryAdapter);
        let registry = HandlerRegistry::new(&test.ctx.config.topics);

        let notification = NotificationMessage::custom(
            "user_1".into(),
            "hello".into(),
            Default::default(),
            chrono::Utc::now(),
        );
        let outbound = InboundMessage {
            topic: test.topic(Topic::OutboundNotifications),
            partition: 0,
            offset: 0,
            key: None,
            payload: serde_json::to_vec(&notification).unwrap(),
        };
        assert_eq!(
            dispatch(&registry, &outbound, &test.ctx).await,
            DispatchOutcome::Panicked
        );

        let event = event_factory(CalendarEventKind::Deleted, ChronoDuration::hours(1));
        let inbound = InboundMessage {
            topic: test.topic(Topic::CalendarEvents),
            partition: 0,
            offset: 1,
            key: None,
            payload: serde_json::to_vec(&event).unwrap(),
        };
        assert_eq!(
            dispatch(&registry, &inbound, &test.ctx).await,
            DispatchOutcome::Handled
        );

        let stats = test.ctx.stats.snapshot();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.events_processed, 1);
    }

    #[actix_web::main]
    #[test]
    async fn loop_survives_bad_messages_and_delivers_notifications() {
        let test = setup();
        test.ctx.delivery.connect().await.unwrap();
        let registry = HandlerRegistry::new(&test.ctx.config.topics);
        test.ctx
            .broker
            .consumer
            .subscribe(&registry.topic_names())
            .await
            .unwrap();

        let calendar_events = test.topic(Topic::CalendarEvents);
        test.broker.push(&calendar_events, None, b"not json");
        for kind in vec![
            CalendarEventKind::Created,
            CalendarEventKind::Updated,
            CalendarEventKind::Deleted,
        ] {
            let event = event_factory(kind, ChronoDuration::hours(1));
            test.broker.push(
                &calendar_events,
                Some("user_1"),
                &serde_json::to_vec(&event).unwrap(),
            );
        }

        let consumer_loop = actix_web::rt::spawn(run_consumer_loop(registry, test.ctx.clone()));
        sleep(Duration::from_millis(200)).await;
        test.ctx.broker.consumer.disconnect().await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), consumer_loop)
            .await
            .expect("Consumer loop to stop after disconnect")
            .unwrap();

        let stats = test.ctx.stats.snapshot();
        assert_eq!(stats.events_processed, 3);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.reminders_scheduled, 1);
        // Every notification made it through the outbound topic to the chat
        assert_eq!(stats.notifications_sent, 3);
        assert_eq!(test.delivery.sent().len(), 3);
        // 4 inbound and 3 outbound messages
        assert_eq!(test.broker.acked().len(), 7);
    }
}
