use nettu_notifier_domain::Topic;
use nettu_notifier_utils::create_random_secret;
use std::{str::FromStr, time::Duration};
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret code required in the `x-admin-key` header by the admin routes
    pub admin_secret_code: String,
    /// Port for the application to run on
    pub port: usize,
    pub kafka: KafkaConfig,
    pub topics: TopicsConfig,
    /// Incoming webhook of the chat channel notifications are posted to.
    /// Notifications are only recorded in memory when this is not set.
    pub chat_webhook_url: Option<Url>,
    /// How often the reminder store is polled for reminders that are about
    /// to fire. It is also the lookahead window of every poll.
    pub reminder_poll_interval: Duration,
    /// Upper bound for the graceful shutdown sequence before the process exits
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma separated list of bootstrap brokers
    pub brokers: String,
    pub consumer_group: String,
    pub client_id: String,
    /// Bound for reaching the broker at startup
    pub connect_timeout: Duration,
    /// The group coordinator rebalances the consumer away if it has not
    /// heard a heartbeat within this timeout.
    pub session_timeout: Duration,
    /// Must be lower than `session_timeout`. The heartbeat is sent by the
    /// client's background thread, so it keeps going while a handler runs.
    pub heartbeat_interval: Duration,
    /// Bound for a single publish including the broker acknowledgement
    pub producer_timeout: Duration,
}

/// Names of the topics on the broker
#[derive(Debug, Clone)]
pub struct TopicsConfig {
    pub calendar_events: String,
    pub outbound_notifications: String,
    pub user_activities: String,
    pub email_notifications: String,
    pub push_notifications: String,
}

impl TopicsConfig {
    pub fn name(&self, topic: Topic) -> &str {
        match topic {
            Topic::CalendarEvents => &self.calendar_events,
            Topic::OutboundNotifications => &self.outbound_notifications,
            Topic::UserActivities => &self.user_activities,
            Topic::EmailNotifications => &self.email_notifications,
            Topic::PushNotifications => &self.push_notifications,
        }
    }

    fn from_env() -> Self {
        let name = |var: &str, topic: Topic| {
            std::env::var(var).unwrap_or_else(|_| topic.default_name().to_string())
        };
        Self {
            calendar_events: name("TOPIC_CALENDAR_EVENTS", Topic::CalendarEvents),
            outbound_notifications: name(
                "TOPIC_OUTBOUND_NOTIFICATIONS",
                Topic::OutboundNotifications,
            ),
            user_activities: name("TOPIC_USER_ACTIVITIES", Topic::UserActivities),
            email_notifications: name("TOPIC_EMAIL_NOTIFICATIONS", Topic::EmailNotifications),
            push_notifications: name("TOPIC_PUSH_NOTIFICATIONS", Topic::PushNotifications),
        }
    }
}

impl Default for TopicsConfig {
    fn default() -> Self {
        let name = |topic: Topic| topic.default_name().to_string();
        Self {
            calendar_events: name(Topic::CalendarEvents),
            outbound_notifications: name(Topic::OutboundNotifications),
            user_activities: name(Topic::UserActivities),
            email_notifications: name(Topic::EmailNotifications),
            push_notifications: name(Topic::PushNotifications),
        }
    }
}

/// Parses the environment variable or falls back to the default with a warning
/// when it is present but malformed.
fn parse_env<T: FromStr + std::fmt::Display>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl KafkaConfig {
    fn from_env() -> Self {
        let session_timeout_ms = parse_env("KAFKA_SESSION_TIMEOUT_MS", 30_000u64);
        let mut heartbeat_interval_ms = parse_env("KAFKA_HEARTBEAT_INTERVAL_MS", 3_000u64);
        if heartbeat_interval_ms >= session_timeout_ms {
            heartbeat_interval_ms = session_timeout_ms / 3;
            warn!(
                "KAFKA_HEARTBEAT_INTERVAL_MS must be lower than KAFKA_SESSION_TIMEOUT_MS, using {}ms.",
                heartbeat_interval_ms
            );
        }
        Self {
            brokers: std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".into()),
            consumer_group: std::env::var("KAFKA_CONSUMER_GROUP")
                .unwrap_or_else(|_| "nettu-notifier".into()),
            client_id: std::env::var("KAFKA_CLIENT_ID").unwrap_or_else(|_| "nettu-notifier".into()),
            connect_timeout: Duration::from_millis(parse_env(
                "KAFKA_CONNECT_TIMEOUT_MS",
                10_000u64,
            )),
            session_timeout: Duration::from_millis(session_timeout_ms),
            heartbeat_interval: Duration::from_millis(heartbeat_interval_ms),
            producer_timeout: Duration::from_millis(parse_env(
                "KAFKA_PRODUCER_TIMEOUT_MS",
                5_000u64,
            )),
        }
    }
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".into(),
            consumer_group: "nettu-notifier".into(),
            client_id: "nettu-notifier".into(),
            connect_timeout: Duration::from_secs(10),
            session_timeout: Duration::from_secs(30),
            heartbeat_interval: Duration::from_secs(3),
            producer_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let admin_secret_code = match std::env::var("ADMIN_SECRET_CODE") {
            Ok(code) => code,
            Err(_) => {
                info!("Did not find ADMIN_SECRET_CODE environment variable. Going to create one.");
                let code = create_random_secret(16);
                info!("Secret code for admin routes was generated and set to: {}", code);
                code
            }
        };
        let chat_webhook_url = match std::env::var("CHAT_WEBHOOK_URL") {
            Ok(url) => match Url::parse(&url) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(
                        "The given CHAT_WEBHOOK_URL is not a valid url: {}. Notifications will not be posted to the chat.",
                        e
                    );
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            admin_secret_code,
            port: parse_env("PORT", 5000usize),
            kafka: KafkaConfig::from_env(),
            topics: TopicsConfig::from_env(),
            chat_webhook_url,
            reminder_poll_interval: Duration::from_secs(parse_env(
                "REMINDER_POLL_INTERVAL_SECS",
                30u64,
            )),
            shutdown_timeout: Duration::from_secs(parse_env("SHUTDOWN_TIMEOUT_SECS", 10u64)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_topic_name() {
        let topics = TopicsConfig::default();
        assert_eq!(topics.name(Topic::CalendarEvents), "calendar-events");
        assert_eq!(
            topics.name(Topic::OutboundNotifications),
            "outbound-notifications"
        );
        assert_eq!(topics.name(Topic::UserActivities), "user-activities");
    }

    #[test]
    fn falls_back_on_malformed_values() {
        std::env::set_var("NETTU_NOTIFIER_TEST_PORT", "not-a-port");
        assert_eq!(parse_env("NETTU_NOTIFIER_TEST_PORT", 5000usize), 5000);
        std::env::set_var("NETTU_NOTIFIER_TEST_PORT", "6000");
        assert_eq!(parse_env("NETTU_NOTIFIER_TEST_PORT", 5000usize), 6000);
        assert_eq!(parse_env("NETTU_NOTIFIER_TEST_MISSING", 7u64), 7);
    }
}
