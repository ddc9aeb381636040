use actix_web::{web, HttpResponse};
use nettu_notifier_api_structs::dtos::NotificationSettingsDTO;
use nettu_notifier_api_structs::update_settings::*;
use tracing::info;

/// Accepts the settings and echoes them without storing anything
pub async fn update_settings_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
) -> HttpResponse {
    let owner_id = path_params.into_inner().owner_id;
    info!(owner_id = %owner_id, "Settings update received");
    HttpResponse::Ok().json(APIResponse {
        settings: NotificationSettingsDTO {
            owner_id,
            settings: body.0.settings,
        },
    })
}
