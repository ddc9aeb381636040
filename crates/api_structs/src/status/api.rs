use crate::dtos::{ConnectivityDTO, StatsDTO};
use serde::{Deserialize, Serialize};

pub const HEALTH_STATUS_OK: &str = "ok";
pub const HEALTH_STATUS_UNAVAILABLE: &str = "unavailable";

pub mod get_service_health {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub status: String,
        #[serde(flatten)]
        pub connectivity: ConnectivityDTO,
        pub uptime_secs: i64,
    }

    impl APIResponse {
        pub fn new(connectivity: ConnectivityDTO, uptime_secs: i64) -> Self {
            let status = if connectivity.is_healthy() {
                HEALTH_STATUS_OK
            } else {
                HEALTH_STATUS_UNAVAILABLE
            };
            Self {
                status: status.to_string(),
                connectivity,
                uptime_secs,
            }
        }
    }
}

pub mod get_service_stats {
    use super::*;

    pub type APIResponse = StatsDTO;
}
