mod get_health;
mod get_metrics;
mod get_stats;

use actix_web::web;
use get_health::get_service_health_controller;
use get_metrics::get_metrics_controller;
use get_stats::get_service_stats_controller;
use nettu_notifier_api_structs::dtos::ConnectivityDTO;
use nettu_notifier_infra::NotifierContext;

pub use get_stats::GetServiceStatsUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(get_service_health_controller));
    cfg.route("/status", web::get().to(get_service_stats_controller));
    cfg.route("/metrics", web::get().to(get_metrics_controller));
}

fn connectivity(ctx: &NotifierContext) -> ConnectivityDTO {
    ConnectivityDTO {
        consumer_connected: ctx.broker.consumer.is_connected(),
        producer_connected: ctx.broker.producer.is_connected(),
        delivery_ready: ctx.delivery.is_ready(),
    }
}

fn uptime_secs(ctx: &NotifierContext) -> i64 {
    (ctx.sys.now() - ctx.stats.start_time()).num_seconds().max(0)
}
