use super::publish_notification;
use crate::error::NotifierError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use nettu_notifier_api_structs::send_notification::*;
use nettu_notifier_domain::{Metadata, NotificationMessage};
use nettu_notifier_infra::{BrokerError, NotifierContext};

pub async fn send_custom_notification_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    let body = body.0;
    let usecase = SendCustomNotificationUseCase {
        owner_id: body.owner_id,
        text: body.message,
        metadata: body.metadata.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|notification| HttpResponse::Created().json(APIResponse::new(notification)))
        .map_err(NotifierError::from)
}

/// Publishes a `Custom` notification. Succeeds once the broker acknowledged
/// the message, the delivery itself happens later on.
#[derive(Debug)]
pub struct SendCustomNotificationUseCase {
    pub owner_id: String,
    pub text: String,
    pub metadata: Metadata,
}

#[derive(Debug)]
pub enum UseCaseError {
    EmptyOwner,
    EmptyMessage,
    Publish(BrokerError),
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyOwner => Self::BadClientData("The ownerId can not be empty".into()),
            UseCaseError::EmptyMessage => {
                Self::BadClientData("The message can not be empty".into())
            }
            UseCaseError::Publish(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendCustomNotificationUseCase {
    type Response = NotificationMessage;

    type Error = UseCaseError;

    const NAME: &'static str = "SendCustomNotification";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        if self.owner_id.trim().is_empty() {
            return Err(UseCaseError::EmptyOwner);
        }
        if self.text.trim().is_empty() {
            return Err(UseCaseError::EmptyMessage);
        }

        let notification = NotificationMessage::custom(
            self.owner_id.clone(),
            self.text.clone(),
            self.metadata.clone(),
            ctx.sys.now(),
        );
        publish_notification(&notification, ctx)
            .await
            .map_err(UseCaseError::Publish)?;

        Ok(notification)
    }
}
