use nettu_notifier_domain::Stats;
use serde::{Deserialize, Serialize};

/// Connectivity of the collaborators the pipeline depends on
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityDTO {
    pub consumer_connected: bool,
    pub producer_connected: bool,
    pub delivery_ready: bool,
}

impl ConnectivityDTO {
    pub fn is_healthy(&self) -> bool {
        self.consumer_connected && self.producer_connected && self.delivery_ready
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsDTO {
    #[serde(flatten)]
    pub stats: Stats,
    #[serde(flatten)]
    pub connectivity: ConnectivityDTO,
    pub uptime_secs: i64,
}
