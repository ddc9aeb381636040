mod deliver_notification;
mod process_calendar_event;
mod process_user_activity;
mod router;
mod send_custom_notification;

use actix_web::web;
use nettu_notifier_domain::{NotificationMessage, Topic};
use nettu_notifier_infra::{publish_json, BrokerError, NotifierContext};
pub use router::{HandlerError, NotificationRouter};
use send_custom_notification::send_custom_notification_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/notify", web::post().to(send_custom_notification_controller));
}

/// Publishes the notification on the outbound topic keyed by its owner
pub async fn publish_notification(
    notification: &NotificationMessage,
    ctx: &NotifierContext,
) -> Result<(), BrokerError> {
    publish_json(
        ctx.broker.producer.as_ref(),
        ctx.config.topics.name(Topic::OutboundNotifications),
        notification.owner_id(),
        notification,
    )
    .await
}
