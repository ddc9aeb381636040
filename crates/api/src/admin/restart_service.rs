use crate::{error::NotifierError, shared::auth::protect_admin_route};
use actix_web::{web, HttpRequest, HttpResponse};
use nettu_notifier_api_structs::restart_service::*;
use nettu_notifier_infra::NotifierContext;
use tracing::warn;

/// Starts the shutdown sequence. The process exits once it is done and is
/// expected to be started again by its supervisor.
pub async fn restart_service_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_admin_route(&http_req, &ctx)?;

    warn!("Restart requested through the admin api");
    ctx.shutdown.trigger();

    Ok(HttpResponse::Accepted().json(APIResponse {
        message: "Shutting down for restart".into(),
    }))
}
