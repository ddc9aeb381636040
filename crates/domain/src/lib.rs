mod activity;
mod event;
mod notification;
mod reminder;
mod shared;
mod stats;
mod topic;

pub use activity::{UserActivity, LOGIN_ACTIVITY};
pub use event::{CalendarEvent, CalendarEventKind};
pub use notification::{InvalidNotificationError, NotificationKind, NotificationMessage};
pub use reminder::{ReminderJob, REMINDER_LEAD_MINUTES};
pub use shared::metadata::Metadata;
pub use stats::Stats;
pub use topic::Topic;
