use super::GetServiceStatsUseCase;
use crate::shared::usecase::execute;
use actix_web::{http::header, web, HttpResponse};
use nettu_notifier_api_structs::dtos::StatsDTO;
use nettu_notifier_infra::NotifierContext;
use std::fmt::Write;

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub async fn get_metrics_controller(ctx: web::Data<NotifierContext>) -> HttpResponse {
    match execute(GetServiceStatsUseCase {}, &ctx).await {
        Ok(stats) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, METRICS_CONTENT_TYPE))
            .body(render_metrics(&stats)),
        Err(e) => match e {},
    }
}

fn write_metric(out: &mut String, name: &str, kind: &str, help: &str, value: u64) {
    let _ = writeln!(out, "# HELP nettu_notifier_{} {}", name, help);
    let _ = writeln!(out, "# TYPE nettu_notifier_{} {}", name, kind);
    let _ = writeln!(out, "nettu_notifier_{} {}", name, value);
}

/// Renders the stats in the plain text exposition format
pub fn render_metrics(stats: &StatsDTO) -> String {
    let mut out = String::new();
    let counters = [
        (
            "events_processed_total",
            "Calendar events processed",
            stats.stats.events_processed,
        ),
        (
            "notifications_sent_total",
            "Notifications delivered to the chat platform",
            stats.stats.notifications_sent,
        ),
        (
            "reminders_scheduled_total",
            "Reminders scheduled",
            stats.stats.reminders_scheduled,
        ),
        ("errors_total", "Failed message handlings", stats.stats.errors),
    ];
    for (name, help, value) in counters.iter() {
        write_metric(&mut out, name, "counter", help, *value);
    }

    let gauges = [
        (
            "consumer_connected",
            "Whether the broker consumer is connected",
            stats.connectivity.consumer_connected as u64,
        ),
        (
            "producer_connected",
            "Whether the broker producer is connected",
            stats.connectivity.producer_connected as u64,
        ),
        (
            "delivery_ready",
            "Whether the chat client is ready",
            stats.connectivity.delivery_ready as u64,
        ),
        (
            "uptime_seconds",
            "Seconds since the process started",
            stats.uptime_secs.max(0) as u64,
        ),
    ];
    for (name, help, value) in gauges.iter() {
        write_metric(&mut out, name, "gauge", help, *value);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use nettu_notifier_api_structs::dtos::ConnectivityDTO;
    use nettu_notifier_domain::Stats;

    #[test]
    fn renders_counters_and_gauges() {
        let stats = StatsDTO {
            stats: Stats {
                events_processed: 4,
                notifications_sent: 3,
                reminders_scheduled: 1,
                errors: 2,
                start_time: Utc::now(),
            },
            connectivity: ConnectivityDTO {
                consumer_connected: true,
                producer_connected: true,
                delivery_ready: false,
            },
            uptime_secs: 61,
        };
        let metrics = render_metrics(&stats);
        assert!(metrics.contains("# TYPE nettu_notifier_events_processed_total counter\n"));
        assert!(metrics.contains("nettu_notifier_events_processed_total 4\n"));
        assert!(metrics.contains("nettu_notifier_notifications_sent_total 3\n"));
        assert!(metrics.contains("nettu_notifier_reminders_scheduled_total 1\n"));
        assert!(metrics.contains("nettu_notifier_errors_total 2\n"));
        assert!(metrics.contains("nettu_notifier_consumer_connected 1\n"));
        assert!(metrics.contains("nettu_notifier_delivery_ready 0\n"));
        assert!(metrics.contains("nettu_notifier_uptime_seconds 61\n"));
    }
}
