/// The topics the pipeline knows about. Their names on the broker are
/// configuration, so an observed topic name is resolved to one of these
/// before a message gets dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Inbound `CalendarEvent`s
    CalendarEvents,
    /// `NotificationMessage`s awaiting delivery
    OutboundNotifications,
    /// Inbound `UserActivity`s
    UserActivities,
    EmailNotifications,
    PushNotifications,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::CalendarEvents,
        Topic::OutboundNotifications,
        Topic::UserActivities,
        Topic::EmailNotifications,
        Topic::PushNotifications,
    ];

    pub fn default_name(&self) -> &'static str {
        match self {
            Self::CalendarEvents => "calendar-events",
            Self::OutboundNotifications => "outbound-notifications",
            Self::UserActivities => "user-activities",
            Self::EmailNotifications => "email-notifications",
            Self::PushNotifications => "push-notifications",
        }
    }
}
