use super::publish_notification;
use crate::reminder::ScheduleReminderUseCase;
use crate::shared::usecase::{execute, UseCase};
use nettu_notifier_domain::{CalendarEvent, CalendarEventKind, NotificationMessage};
use nettu_notifier_infra::{BrokerError, NotifierContext};

/// Turns an inbound `CalendarEvent` into a notification on the outbound topic
/// and schedules the reminder for created events.
#[derive(Debug)]
pub struct ProcessCalendarEventUseCase {
    pub event: CalendarEvent,
}

#[derive(Debug)]
pub enum UseCaseError {
    Publish(BrokerError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessCalendarEventUseCase {
    type Response = NotificationMessage;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessCalendarEvent";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        ctx.stats.event_processed();

        let notification = NotificationMessage::for_event(self.event.clone(), ctx.sys.now());
        publish_notification(&notification, ctx)
            .await
            .map_err(UseCaseError::Publish)?;

        if self.event.kind == CalendarEventKind::Created {
            let schedule_reminder = ScheduleReminderUseCase {
                event: self.event.clone(),
            };
            execute(schedule_reminder, ctx)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        Ok(notification)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_context::{event_factory, setup};
    use chrono::Duration;
    use nettu_notifier_domain::{NotificationKind, Topic};

    #[actix_web::main]
    #[test]
    async fn created_event_publishes_notification_and_schedules_reminder() {
        let test = setup();
        let event = event_factory(CalendarEventKind::Created, Duration::hours(2));

        let usecase = ProcessCalendarEventUseCase {
            event: event.clone(),
        };
        let notification = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(notification.kind(), NotificationKind::EventCreated);
        assert_eq!(notification.event(), Some(&event));

        let published = test.broker.published(&test.topic(Topic::OutboundNotifications));
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].key, Some(b"user_1".to_vec()));
        let on_wire: NotificationMessage = serde_json::from_slice(&published[0].payload).unwrap();
        assert_eq!(on_wire, notification);

        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 1);
        let stats = test.ctx.stats.snapshot();
        assert_eq!(stats.events_processed, 1);
        assert_eq!(stats.reminders_scheduled, 1);
    }

    #[actix_web::main]
    #[test]
    async fn updated_and_deleted_events_do_not_schedule_reminders() {
        let test = setup();
        for (kind, expected) in vec![
            (CalendarEventKind::Updated, NotificationKind::EventUpdated),
            (CalendarEventKind::Deleted, NotificationKind::EventDeleted),
        ] {
            let usecase = ProcessCalendarEventUseCase {
                event: event_factory(kind, Duration::hours(2)),
            };
            let notification = execute(usecase, &test.ctx).await.unwrap();
            assert_eq!(notification.kind(), expected);
        }

        let published = test.broker.published(&test.topic(Topic::OutboundNotifications));
        assert_eq!(published.len(), 2);
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 0);
        let stats = test.ctx.stats.snapshot();
        assert_eq!(stats.events_processed, 2);
        assert_eq!(stats.reminders_scheduled, 0);
    }

    #[actix_web::main]
    #[test]
    async fn imminent_created_event_is_not_reminded() {
        let test = setup();
        let usecase = ProcessCalendarEventUseCase {
            event: event_factory(CalendarEventKind::Created, Duration::minutes(10)),
        };
        assert!(execute(usecase, &test.ctx).await.is_ok());
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 0);
        assert_eq!(test.ctx.stats.snapshot().reminders_scheduled, 0);
    }

    #[actix_web::main]
    #[test]
    async fn publish_failure_skips_reminder() {
        let test = setup();
        test.producer.set_failing(true);
        let usecase = ProcessCalendarEventUseCase {
            event: event_factory(CalendarEventKind::Created, Duration::hours(2)),
        };
        let res = execute(usecase, &test.ctx).await;
        assert!(matches!(res, Err(UseCaseError::Publish(_))));
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 0);
        assert_eq!(test.ctx.stats.snapshot().events_processed, 1);
    }
}
