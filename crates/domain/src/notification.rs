use crate::{
    event::{CalendarEvent, CalendarEventKind},
    shared::metadata::Metadata,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EventCreated,
    EventUpdated,
    EventDeleted,
    EventReminder,
    Custom,
}

impl From<CalendarEventKind> for NotificationKind {
    fn from(kind: CalendarEventKind) -> Self {
        match kind {
            CalendarEventKind::Created => Self::EventCreated,
            CalendarEventKind::Updated => Self::EventUpdated,
            CalendarEventKind::Deleted => Self::EventDeleted,
        }
    }
}

impl NotificationKind {
    fn render(&self, title: &str) -> String {
        match self {
            Self::EventCreated => format!("new event created: {}", title),
            Self::EventUpdated => format!("event updated: {}", title),
            Self::EventDeleted => format!("event deleted: {}", title),
            Self::EventReminder => format!("reminder: {} starts soon", title),
            Self::Custom => title.to_string(),
        }
    }
}

/// The canonical message published on the outbound notifications topic and
/// consumed by the delivery adapter.
///
/// A `NotificationMessage` carries the `CalendarEvent` it was created from for
/// every kind except `Custom`, which never has one. The fields are private so
/// that the only ways to get one are the constructors below and deserializing,
/// which both uphold that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawNotificationMessage")]
pub struct NotificationMessage {
    kind: NotificationKind,
    owner_id: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event: Option<CalendarEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
    emitted_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidNotificationError {
    #[error("Notification of kind {0:?} must embed the calendar event it was created from")]
    MissingEvent(NotificationKind),
    #[error("Custom notifications can not embed a calendar event")]
    UnexpectedEvent,
}

impl NotificationMessage {
    /// Notification for an inbound `CalendarEvent` with the kind mapped from
    /// the event kind and the text rendered from the kind template.
    pub fn for_event(event: CalendarEvent, emitted_at: DateTime<Utc>) -> Self {
        let kind = NotificationKind::from(event.kind);
        Self {
            kind,
            owner_id: event.owner_id.clone(),
            text: kind.render(&event.title),
            event: Some(event),
            metadata: None,
            emitted_at,
        }
    }

    /// Reminder notification. The embedded event is always rendered as a
    /// created event, whatever kind the snapshot had.
    pub fn reminder(mut event: CalendarEvent, emitted_at: DateTime<Utc>) -> Self {
        event.kind = CalendarEventKind::Created;
        let kind = NotificationKind::EventReminder;
        Self {
            kind,
            owner_id: event.owner_id.clone(),
            text: kind.render(&event.title),
            event: Some(event),
            metadata: None,
            emitted_at,
        }
    }

    pub fn custom(
        owner_id: String,
        text: String,
        metadata: Metadata,
        emitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: NotificationKind::Custom,
            owner_id,
            text,
            event: None,
            metadata: Some(metadata),
            emitted_at,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn event(&self) -> Option<&CalendarEvent> {
        self.event.as_ref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn emitted_at(&self) -> DateTime<Utc> {
        self.emitted_at
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNotificationMessage {
    kind: NotificationKind,
    owner_id: String,
    text: String,
    #[serde(default)]
    event: Option<CalendarEvent>,
    #[serde(default)]
    metadata: Option<Metadata>,
    emitted_at: DateTime<Utc>,
}

impl TryFrom<RawNotificationMessage> for NotificationMessage {
    type Error = InvalidNotificationError;

    fn try_from(raw: RawNotificationMessage) -> Result<Self, Self::Error> {
        match (raw.kind, &raw.event) {
            (NotificationKind::Custom, Some(_)) => {
                return Err(InvalidNotificationError::UnexpectedEvent)
            }
            (NotificationKind::Custom, None) | (_, Some(_)) => (),
            (kind, None) => return Err(InvalidNotificationError::MissingEvent(kind)),
        }
        Ok(Self {
            kind: raw.kind,
            owner_id: raw.owner_id,
            text: raw.text,
            event: raw.event,
            metadata: raw.metadata,
            emitted_at: raw.emitted_at,
        })
    }
}
