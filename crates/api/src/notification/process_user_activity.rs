use super::publish_notification;
use crate::shared::usecase::UseCase;
use nettu_notifier_domain::{NotificationMessage, UserActivity};
use nettu_notifier_infra::{BrokerError, NotifierContext};
use tracing::info;

pub const ACTIVITY_TYPE_METADATA_KEY: &str = "activityType";

/// A login of a user is announced with a custom notification, every other
/// activity is only logged.
#[derive(Debug)]
pub struct ProcessUserActivityUseCase {
    pub activity: UserActivity,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessUserActivityUseCase {
    type Response = Option<NotificationMessage>;

    type Error = BrokerError;

    const NAME: &'static str = "ProcessUserActivity";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        if !self.activity.is_login() {
            info!(
                user_id = %self.activity.user_id,
                activity_type = %self.activity.activity_type,
                "Ignoring user activity"
            );
            return Ok(None);
        }

        let mut metadata = self.activity.metadata.clone();
        metadata.insert(
            ACTIVITY_TYPE_METADATA_KEY.into(),
            self.activity.activity_type.clone(),
        );
        let notification = NotificationMessage::custom(
            self.activity.user_id.clone(),
            format!("user {} logged in", self.activity.user_id),
            metadata,
            ctx.sys.now(),
        );
        publish_notification(&notification, ctx).await?;

        Ok(Some(notification))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::{test_context::setup, usecase::execute};
    use nettu_notifier_domain::{Metadata, NotificationKind, Topic};

    fn activity(activity_type: &str) -> UserActivity {
        let mut metadata = Metadata::new();
        metadata.insert("ip".into(), "10.0.0.1".into());
        UserActivity {
            user_id: "user_1".into(),
            activity_type: activity_type.into(),
            timestamp: None,
            metadata,
        }
    }

    #[actix_web::main]
    #[test]
    async fn login_publishes_custom_notification() {
        let test = setup();
        let usecase = ProcessUserActivityUseCase {
            activity: activity("login"),
        };
        let notification = execute(usecase, &test.ctx)
            .await
            .unwrap()
            .expect("Login to produce a notification");

        assert_eq!(notification.kind(), NotificationKind::Custom);
        assert_eq!(notification.text(), "user user_1 logged in");
        let metadata = notification.metadata().unwrap();
        assert_eq!(metadata.get("ip").unwrap(), "10.0.0.1");
        assert_eq!(metadata.get(ACTIVITY_TYPE_METADATA_KEY).unwrap(), "login");
        assert_eq!(
            test.broker
                .published(&test.topic(Topic::OutboundNotifications))
                .len(),
            1
        );
    }

    #[actix_web::main]
    #[test]
    async fn other_activities_are_ignored() {
        let test = setup();
        let usecase = ProcessUserActivityUseCase {
            activity: activity("logout"),
        };
        assert!(execute(usecase, &test.ctx).await.unwrap().is_none());
        assert!(test
            .broker
            .published(&test.topic(Topic::OutboundNotifications))
            .is_empty());
    }
}
