mod reminder;
mod shared;

pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub reminder_repo: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub fn create_postgres(pool: PgPool) -> Self {
        Self {
            reminder_repo: Arc::new(PostgresReminderRepo::new(pool)),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminder_repo: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
