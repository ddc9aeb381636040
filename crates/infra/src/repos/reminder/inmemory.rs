use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use nettu_notifier_domain::ReminderJob;

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<ReminderJob>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn bulk_insert(&self, reminders: &[ReminderJob]) -> anyhow::Result<()> {
        insert_many(reminders, &self.reminders);
        Ok(())
    }

    async fn find_due_before(&self, before: i64) -> anyhow::Result<Vec<ReminderJob>> {
        let mut reminders = find_by(&self.reminders, |r| r.fire_at <= before);
        reminders.sort_by_key(|r| r.fire_at);
        Ok(reminders)
    }

    async fn delete(&self, event_id: &str, fire_at: i64) -> anyhow::Result<()> {
        find_and_delete_by(&self.reminders, |r| r.event.id == event_id && r.fire_at == fire_at);
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(find_by(&self.reminders, |_| true).len())
    }
}
