mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
use nettu_notifier_domain::ReminderJob;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn bulk_insert(&self, reminders: &[ReminderJob]) -> anyhow::Result<()>;
    /// Every reminder with a `fire_at` at or before the given timestamp,
    /// earliest first. They stay stored until `delete` is called for them.
    async fn find_due_before(&self, before: i64) -> anyhow::Result<Vec<ReminderJob>>;
    /// Removes the reminder of the event that fires at `fire_at`
    async fn delete(&self, event_id: &str, fire_at: i64) -> anyhow::Result<()>;
    async fn count(&self) -> anyhow::Result<usize>;
}
