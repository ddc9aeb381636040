use super::IReminderRepo;

use nettu_notifier_domain::{CalendarEvent, ReminderJob};
use sqlx::{types::Json, FromRow, PgPool};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    fire_at: i64,
    event: Json<CalendarEvent>,
}

impl From<ReminderRaw> for ReminderJob {
    fn from(raw: ReminderRaw) -> Self {
        Self {
            event: raw.event.0,
            fire_at: raw.fire_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn bulk_insert(&self, reminders: &[ReminderJob]) -> anyhow::Result<()> {
        for reminder in reminders {
            sqlx::query(
                r#"
            INSERT INTO reminders
            (event_id, owner_id, fire_at, event)
            VALUES($1, $2, $3, $4)
            "#,
            )
            .bind(&reminder.event.id)
            .bind(&reminder.event.owner_id)
            .bind(reminder.fire_at)
            .bind(Json(&reminder.event))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn find_due_before(&self, before: i64) -> anyhow::Result<Vec<ReminderJob>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT r.fire_at, r.event FROM reminders AS r
            WHERE r.fire_at <= $1
            ORDER BY r.fire_at
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn delete(&self, event_id: &str, fire_at: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM reminders AS r
            WHERE r.event_id = $1 AND r.fire_at = $2
            "#,
        )
        .bind(event_id)
        .bind(fire_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reminders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}
