use std::path::PathBuf;
use std::sync::Arc;
use nw_core::NewsStore;
use nw_scrapers::HealthMonitor;
use crate::hub::BroadcastHub;

pub struct AppState {
    pub storage: Arc<dyn NewsStore>,
    pub hub: BroadcastHub,
    pub monitor: HealthMonitor,
    /// Directory served by `/index` and the static fallback.
    pub static_dir: PathBuf,
}
