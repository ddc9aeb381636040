use crate::shared::usecase::UseCase;
use nettu_notifier_domain::ReminderJob;
use nettu_notifier_infra::NotifierContext;

/// Reads the reminders that are due within the lookahead window. They stay in
/// the store until `FireReminderUseCase` has handled them, so a restart
/// before that finds them again.
#[derive(Debug)]
pub struct FindDueRemindersUseCase {
    pub lookahead_millis: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for FindDueRemindersUseCase {
    type Response = Vec<ReminderJob>;

    type Error = UseCaseError;

    const NAME: &'static str = "FindDueReminders";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let before = ctx.sys.get_timestamp_millis() + self.lookahead_millis;
        ctx.repos
            .reminder_repo
            .find_due_before(before)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::ScheduleReminderUseCase;
    use crate::shared::{
        test_context::{event_factory, setup},
        usecase::execute,
    };
    use chrono::Duration;
    use nettu_notifier_domain::CalendarEventKind;

    #[actix_web::main]
    #[test]
    async fn finds_only_reminders_within_lookahead() {
        let test = setup();
        for (id, starts_in) in vec![("1", 16), ("2", 60), ("3", 20)] {
            let mut event = event_factory(CalendarEventKind::Created, Duration::minutes(starts_in));
            event.id = id.into();
            execute(ScheduleReminderUseCase { event }, &test.ctx)
                .await
                .unwrap();
        }

        let usecase = FindDueRemindersUseCase {
            lookahead_millis: 10 * 60 * 1000,
        };
        let due = execute(usecase, &test.ctx).await.unwrap();
        let ids: Vec<_> = due.iter().map(|r| r.event.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(test.ctx.repos.reminder_repo.count().await.unwrap(), 3);
    }
}
