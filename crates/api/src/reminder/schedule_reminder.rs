use crate::shared::usecase::UseCase;
use nettu_notifier_domain::{CalendarEvent, ReminderJob};
use nettu_notifier_infra::NotifierContext;
use tracing::{info, warn};

/// Stores the `ReminderJob` for an event. Events that start within the
/// reminder lead time do not get one. A job that fires before the next poll
/// of the store is also handed to the running reminders job.
#[derive(Debug)]
pub struct ScheduleReminderUseCase {
    pub event: CalendarEvent,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleReminderUseCase {
    type Response = Option<ReminderJob>;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleReminder";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let job = match ReminderJob::new(&self.event, ctx.sys.get_timestamp_millis()) {
            Some(job) => job,
            None => return Ok(None),
        };

        ctx.repos
            .reminder_repo
            .bulk_insert(&[job.clone()])
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        // Counted when scheduled, whether or not it ever fires
        ctx.stats.reminder_scheduled();
        info!(
            event_id = %job.event.id,
            owner_id = %job.event.owner_id,
            fire_at = job.fire_at,
            "Reminder scheduled"
        );

        let next_poll = ctx.sys.get_timestamp_millis()
            + ctx.config.reminder_poll_interval.as_millis() as i64;
        if job.fire_at < next_poll && !ctx.reminder_queue.arm(job.clone()) {
            warn!(
                event_id = %job.event.id,
                "Reminders job is not running, the reminder fires on its next poll"
            );
        }

        Ok(Some(job))
    }
}
