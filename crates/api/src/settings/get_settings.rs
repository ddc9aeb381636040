use actix_web::{web, HttpResponse};
use nettu_notifier_api_structs::dtos::NotificationSettingsDTO;
use nettu_notifier_api_structs::get_settings::*;
use tracing::info;

/// Settings are not stored by the pipeline, every owner has the defaults
pub async fn get_settings_controller(path_params: web::Path<PathParams>) -> HttpResponse {
    let owner_id = path_params.into_inner().owner_id;
    info!(owner_id = %owner_id, "Settings requested");
    HttpResponse::Ok().json(APIResponse {
        settings: NotificationSettingsDTO {
            owner_id,
            settings: Default::default(),
        },
    })
}
