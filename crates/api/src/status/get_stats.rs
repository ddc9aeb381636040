use super::{connectivity, uptime_secs};
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use nettu_notifier_api_structs::dtos::StatsDTO;
use nettu_notifier_api_structs::get_service_stats::APIResponse;
use nettu_notifier_infra::NotifierContext;
use std::convert::Infallible;

pub async fn get_service_stats_controller(ctx: web::Data<NotifierContext>) -> HttpResponse {
    match execute(GetServiceStatsUseCase {}, &ctx).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => match e {},
    }
}

/// Counters together with the connectivity of the pipeline. Reading them
/// never waits for a handler.
#[derive(Debug)]
pub struct GetServiceStatsUseCase {}

#[async_trait::async_trait(?Send)]
impl UseCase for GetServiceStatsUseCase {
    type Response = APIResponse;

    type Error = Infallible;

    const NAME: &'static str = "GetServiceStats";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        Ok(StatsDTO {
            stats: ctx.stats.snapshot(),
            connectivity: connectivity(ctx),
            uptime_secs: uptime_secs(ctx),
        })
    }
}
