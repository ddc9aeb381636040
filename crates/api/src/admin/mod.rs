mod restart_service;

use actix_web::web;
use restart_service::restart_service_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/restart", web::post().to(restart_service_controller));
}
