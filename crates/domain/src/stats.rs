use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time view of the process wide pipeline counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub events_processed: u64,
    pub notifications_sent: u64,
    /// Counted when a reminder is scheduled, not when it fires
    pub reminders_scheduled: u64,
    pub errors: u64,
    pub start_time: DateTime<Utc>,
}
