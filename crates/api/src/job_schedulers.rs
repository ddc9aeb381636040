use crate::{
    reminder::{FindDueRemindersUseCase, FireReminderUseCase},
    shared::usecase::execute,
};
use actix_web::rt::time::{interval, sleep};
use nettu_notifier_domain::ReminderJob;
use nettu_notifier_infra::NotifierContext;
use std::{collections::HashSet, time::Duration};
use tokio::{
    sync::mpsc::UnboundedReceiver,
    task::{JoinHandle, JoinSet},
};
use tracing::{error, info, warn};

/// Identifies a stored reminder
type ReminderKey = (String, i64);

/// Millis until the reminder should fire, zero when it is overdue
pub fn get_fire_delay(now_ts: i64, fire_at: i64) -> u64 {
    if fire_at > now_ts {
        (fire_at - now_ts) as u64
    } else {
        0
    }
}

/// One shot timers of the reminders that are about to fire. A stored reminder
/// is armed at most once at a time.
struct ArmedReminders {
    ctx: NotifierContext,
    armed: HashSet<ReminderKey>,
    timers: JoinSet<ReminderKey>,
}

impl ArmedReminders {
    fn new(ctx: NotifierContext) -> Self {
        Self {
            ctx,
            armed: HashSet::new(),
            timers: JoinSet::new(),
        }
    }

    fn arm(&mut self, reminder: ReminderJob) {
        let key = (reminder.event.id.clone(), reminder.fire_at);
        if self.armed.insert(key) {
            self.timers.spawn_local(fire_reminder(reminder, self.ctx.clone()));
        }
    }

    /// Forgets the timers that already fired
    fn reap(&mut self) {
        while let Some(res) = self.timers.try_join_next() {
            if let Ok(key) = res {
                self.armed.remove(&key);
            }
        }
    }
}

/// Polls the reminder store and arms a one shot timer for every reminder that
/// is due before the next poll. Reminders scheduled in between that are due
/// before the next poll arrive through the reminder queue. Aborting the
/// returned task aborts every armed timer as well, the reminders stay stored.
pub fn start_reminders_job(ctx: NotifierContext) -> JoinHandle<()> {
    actix_web::rt::spawn(async move {
        let poll_interval = ctx.config.reminder_poll_interval;
        let mut queue = ctx.reminder_queue.take_receiver();
        if queue.is_none() {
            warn!("Reminder queue is already consumed, reminders are only armed on poll");
        }
        let mut reminders = ArmedReminders::new(ctx.clone());
        let mut poll = interval(poll_interval);
        info!("Reminders job started with poll interval: {:?}", poll_interval);
        loop {
            tokio::select! {
                _ = poll.tick() => {
                    reminders.reap();
                    let usecase = FindDueRemindersUseCase {
                        lookahead_millis: poll_interval.as_millis() as i64,
                    };
                    if let Ok(due) = execute(usecase, &ctx).await {
                        for reminder in due {
                            reminders.arm(reminder);
                        }
                    }
                }
                Some(reminder) = next_queued(&mut queue) => {
                    reminders.reap();
                    reminders.arm(reminder);
                }
            }
        }
    })
}

async fn next_queued(queue: &mut Option<UnboundedReceiver<ReminderJob>>) -> Option<ReminderJob> {
    match queue {
        Some(queue) => queue.recv().await,
        None => futures::future::pending().await,
    }
}

async fn fire_reminder(reminder: ReminderJob, ctx: NotifierContext) -> ReminderKey {
    let delay = get_fire_delay(ctx.sys.get_timestamp_millis(), reminder.fire_at);
    sleep(Duration::from_millis(delay)).await;

    let key = (reminder.event.id.clone(), reminder.fire_at);
    match execute(FireReminderUseCase { reminder }, &ctx).await {
        Ok(_) => info!(event_id = %key.0, "Reminder fired"),
        Err(e) => {
            ctx.stats.error();
            error!(event_id = %key.0, error = %e, "Unable to fire reminder");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::release_pipeline;
    use crate::reminder::ScheduleReminderUseCase;
    use crate::shared::test_context::{event_factory, setup, NOW};
    use chrono::Duration as ChronoDuration;
    use nettu_notifier_domain::{CalendarEventKind, NotificationKind, NotificationMessage, Topic};

    #[test]
    fn fire_delay_works() {
        assert_eq!(get_fire_delay(1000, 1500), 500);
        assert_eq!(get_fire_delay(1000, 1000), 0);
        assert_eq!(get_fire_delay(1000, 200), 0);
    }

    #[actix_web::main]
    #[test]
    async fn fires_due_reminders() {
        let test = setup();
        let event = event_factory(CalendarEventKind::Created, ChronoDuration::hours(1));
        let reminder = ReminderJob {
            event,
            // Already due
            fire_at: NOW - 1,
        };
        test.ctx
            .repos
            .reminder_repo
            .bulk_insert(&[reminder])
            .await
            .unwrap();

        let job = start_reminders_job(test.ctx.clone());
        sleep(Duration::from_millis(200)).await;
        job.abort();

        let published = test.broker.published(&test.topic(Topic::OutboundNotifications));
        assert_eq!(published.len(), 1);
        let notification: NotificationMessage =
            serde_json::from_slice(&published[0].payload).unwrap();
        assert_eq!(notification.kind(), NotificationKind::EventReminder);
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 0);
    }

    #[actix_web::main]
    #[test]
    async fn leaves_reminders_outside_of_poll_window() {
        let test = setup();
        let usecase = ScheduleReminderUseCase {
            event: event_factory(CalendarEventKind::Created, ChronoDuration::hours(2)),
        };
        execute(usecase, &test.ctx).await.unwrap();

        let job = start_reminders_job(test.ctx.clone());
        sleep(Duration::from_millis(100)).await;
        job.abort();

        assert!(test
            .broker
            .published(&test.topic(Topic::OutboundNotifications))
            .is_empty());
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn shutdown_keeps_unfired_reminders_stored() {
        let test = setup();
        let reminder = ReminderJob {
            event: event_factory(CalendarEventKind::Created, ChronoDuration::minutes(16)),
            fire_at: NOW + 300,
        };
        test.ctx
            .repos
            .reminder_repo
            .bulk_insert(&[reminder])
            .await
            .unwrap();

        let job = start_reminders_job(test.ctx.clone());
        sleep(Duration::from_millis(50)).await;
        job.abort();
        release_pipeline(&test.ctx, true).await;
        sleep(Duration::from_millis(400)).await;

        let outbound = test.topic(Topic::OutboundNotifications);
        assert!(test.broker.published(&outbound).is_empty());
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 1);

        // The next process finds the reminder in the store and fires it
        let mut restarted = setup();
        restarted.ctx.repos = test.ctx.repos.clone();
        let job = start_reminders_job(restarted.ctx.clone());
        sleep(Duration::from_millis(500)).await;
        job.abort();

        let outbound = restarted.topic(Topic::OutboundNotifications);
        assert_eq!(restarted.broker.published(&outbound).len(), 1);
        assert_eq!(restarted.ctx.repos.reminder_repo.count().await.unwrap(), 0);
    }

    #[actix_web::main]
    #[test]
    async fn arms_reminders_scheduled_between_polls() {
        let mut test = setup();
        test.ctx.config.reminder_poll_interval = Duration::from_secs(2);
        let job = start_reminders_job(test.ctx.clone());
        // The first poll found nothing
        sleep(Duration::from_millis(100)).await;

        let usecase = ScheduleReminderUseCase {
            event: event_factory(
                CalendarEventKind::Created,
                ChronoDuration::minutes(15) + ChronoDuration::milliseconds(300),
            ),
        };
        execute(usecase, &test.ctx).await.unwrap().unwrap();
        sleep(Duration::from_millis(600)).await;

        let published = test.broker.published(&test.topic(Topic::OutboundNotifications));
        assert_eq!(published.len(), 1);
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 0);

        // The next poll does not fire it again
        sleep(Duration::from_millis(1600)).await;
        job.abort();
        let published = test.broker.published(&test.topic(Topic::OutboundNotifications));
        assert_eq!(published.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn arms_a_stored_reminder_once() {
        let test = setup();
        let reminder = ReminderJob {
            event: event_factory(CalendarEventKind::Created, ChronoDuration::hours(1)),
            fire_at: NOW + 60 * 1000,
        };
        let mut reminders = ArmedReminders::new(test.ctx.clone());
        // Found by a poll and handed over through the queue
        reminders.arm(reminder.clone());
        reminders.arm(reminder.clone());
        assert_eq!(reminders.timers.len(), 1);

        let mut other = reminder;
        other.fire_at += 1;
        reminders.arm(other);
        assert_eq!(reminders.timers.len(), 2);
        reminders.timers.abort_all();
    }
}
