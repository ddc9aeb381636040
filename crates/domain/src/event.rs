use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A `CalendarEvent` is the inbound domain event published by the calendar
/// service whenever one of its records is created, updated or deleted.
///
/// The pipeline never modifies it, it only reads it and embeds snapshots of it
/// into the `NotificationMessage`s it emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Stable identifier of the originating record
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Owner of the event. Also used as the partition key for everything
    /// published on behalf of this event.
    pub owner_id: String,
    pub kind: CalendarEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarEventKind {
    Created,
    Updated,
    Deleted,
}
