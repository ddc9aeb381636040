use crate::{event::CalendarEvent, notification::NotificationMessage};
use chrono::{DateTime, Duration, Utc};

/// How long before the start of a `CalendarEvent` its owner is reminded
pub const REMINDER_LEAD_MINUTES: i64 = 15;

/// A `ReminderJob` represents the moment before a `CalendarEvent` starts at
/// which its owner should receive an `EventReminder` notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderJob {
    /// Snapshot of the `CalendarEvent` taken when the job was scheduled.
    /// Later updates or deletes of the event do not touch it.
    pub event: CalendarEvent,
    /// The timestamp in millis at which the reminder should be published
    pub fire_at: i64,
}

impl ReminderJob {
    pub fn fire_at_for(event: &CalendarEvent) -> i64 {
        (event.start_time - Duration::minutes(REMINDER_LEAD_MINUTES)).timestamp_millis()
    }

    /// Creates the job for the given event, unless the fire time is not
    /// strictly after `now_ts`. Events that are already imminent or in
    /// the past are not reminded.
    pub fn new(event: &CalendarEvent, now_ts: i64) -> Option<Self> {
        let fire_at = Self::fire_at_for(event);
        if fire_at <= now_ts {
            return None;
        }
        Some(Self {
            event: event.clone(),
            fire_at,
        })
    }

    pub fn into_notification(self, emitted_at: DateTime<Utc>) -> NotificationMessage {
        NotificationMessage::reminder(self.event, emitted_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalendarEventKind, NotificationKind};
    use chrono::TimeZone;

    fn event_starting_at(start_time: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: "evt_1".into(),
            title: "Planning".into(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
            owner_id: "user_1".into(),
            kind: CalendarEventKind::Created,
        }
    }

    #[test]
    fn it_fires_fifteen_minutes_before_start() {
        let start = Utc.with_ymd_and_hms(2021, 2, 21, 10, 0, 0).unwrap();
        let event = event_starting_at(start);
        let now = (start - Duration::hours(1)).timestamp_millis();

        let job = ReminderJob::new(&event, now).expect("To create reminder job");
        assert_eq!(
            job.fire_at,
            Utc.with_ymd_and_hms(2021, 2, 21, 9, 45, 0)
                .unwrap()
                .timestamp_millis()
        );
        assert_eq!(job.event, event);
    }

    #[test]
    fn it_skips_events_without_future_fire_time() {
        let start = Utc.with_ymd_and_hms(2021, 2, 21, 10, 0, 0).unwrap();
        let event = event_starting_at(start);

        // Fire time exactly now is not strictly in the future
        let now = ReminderJob::fire_at_for(&event);
        assert!(ReminderJob::new(&event, now).is_none());
        // Starts in 10 minutes
        let now = (start - Duration::minutes(10)).timestamp_millis();
        assert!(ReminderJob::new(&event, now).is_none());
        // Already started
        let now = (start + Duration::minutes(1)).timestamp_millis();
        assert!(ReminderJob::new(&event, now).is_none());
        // One milli before the fire time
        let now = ReminderJob::fire_at_for(&event) - 1;
        assert!(ReminderJob::new(&event, now).is_some());
    }

    #[test]
    fn it_renders_reminder_notification() {
        let start = Utc.with_ymd_and_hms(2021, 2, 21, 10, 0, 0).unwrap();
        let mut event = event_starting_at(start);
        event.kind = CalendarEventKind::Updated;
        let job = ReminderJob {
            fire_at: ReminderJob::fire_at_for(&event),
            event,
        };
        let n = job.into_notification(start - Duration::minutes(15));
        assert_eq!(n.kind(), NotificationKind::EventReminder);
        assert_eq!(n.text(), "reminder: Planning starts soon");
        assert_eq!(n.event().unwrap().kind, CalendarEventKind::Created);
    }
}
