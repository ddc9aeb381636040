use super::{connectivity, uptime_secs};
use actix_web::{web, HttpResponse};
use nettu_notifier_api_structs::get_service_health::*;
use nettu_notifier_infra::NotifierContext;

pub async fn get_service_health_controller(ctx: web::Data<NotifierContext>) -> HttpResponse {
    let res = APIResponse::new(connectivity(&ctx), uptime_secs(&ctx));
    if res.connectivity.is_healthy() {
        HttpResponse::Ok().json(res)
    } else {
        HttpResponse::ServiceUnavailable().json(res)
    }
}
