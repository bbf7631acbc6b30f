use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use nw_core::{FailureKind, SaveOutcome};

/// Counters and timestamps for one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceHealth {
    pub last_cycle_started: Option<DateTime<Utc>>,
    /// Last time the homepage was fetched and every link was processed.
    pub last_success: Option<DateTime<Utc>>,
    pub links_discovered: u64,
    pub items_saved: u64,
    pub duplicates: u64,
    pub skipped_short: u64,
    pub skipped_fallback: u64,
    pub failures: BTreeMap<FailureKind, u64>,
}

impl SourceHealth {
    pub fn failure_count(&self, kind: FailureKind) -> u64 {
        self.failures.get(&kind).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthReport {
    pub cycles_completed: u64,
    pub last_cycle_finished: Option<DateTime<Utc>>,
    pub sources: BTreeMap<String, SourceHealth>,
}

#[derive(Default)]
struct State {
    cycles_completed: u64,
    last_cycle_finished: Option<DateTime<Utc>>,
    sources: HashMap<String, SourceHealth>,
}

/// Shared view of what the ingestion loop has been doing, so swallowed
/// failures stay inspectable.
#[derive(Clone, Default)]
pub struct HealthMonitor {
    state: Arc<RwLock<State>>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update(&self, source: &str, f: impl FnOnce(&mut SourceHealth)) {
        let mut state = self.state.write().await;
        f(state.sources.entry(source.to_string()).or_default());
    }

    pub async fn source_started(&self, source: &str) {
        self.update(source, |h| h.last_cycle_started = Some(Utc::now())).await;
    }

    pub async fn source_succeeded(&self, source: &str) {
        self.update(source, |h| h.last_success = Some(Utc::now())).await;
    }

    pub async fn links_discovered(&self, source: &str, count: usize) {
        self.update(source, |h| h.links_discovered += count as u64).await;
    }

    pub async fn record_failure(&self, source: &str, kind: FailureKind) {
        self.update(source, |h| *h.failures.entry(kind).or_insert(0) += 1).await;
    }

    pub async fn record_save(&self, source: &str, outcome: SaveOutcome) {
        self.update(source, |h| match outcome {
            SaveOutcome::Inserted => h.items_saved += 1,
            SaveOutcome::Duplicate => h.duplicates += 1,
            SaveOutcome::Failed => *h.failures.entry(FailureKind::Storage).or_insert(0) += 1,
        })
        .await;
    }

    pub async fn record_short_body(&self, source: &str) {
        self.update(source, |h| h.skipped_short += 1).await;
    }

    pub async fn record_fallback_skipped(&self, source: &str) {
        self.update(source, |h| h.skipped_fallback += 1).await;
    }

    pub async fn cycle_finished(&self) {
        let mut state = self.state.write().await;
        state.cycles_completed += 1;
        state.last_cycle_finished = Some(Utc::now());
    }

    pub async fn source(&self, source: &str) -> Option<SourceHealth> {
        self.state.read().await.sources.get(source).cloned()
    }

    pub async fn report(&self) -> HealthReport {
        let state = self.state.read().await;
        HealthReport {
            cycles_completed: state.cycles_completed,
            last_cycle_finished: state.last_cycle_finished,
            sources: state
                .sources
                .iter()
                .map(|(name, health)| (name.clone(), health.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_accumulate_per_source() {
        let monitor = HealthMonitor::new();
        monitor.source_started("G1").await;
        monitor.record_failure("G1", FailureKind::Network).await;
        monitor.record_failure("G1", FailureKind::Network).await;
        monitor.record_save("G1", SaveOutcome::Inserted).await;
        monitor.record_save("G1", SaveOutcome::Failed).await;
        monitor.record_save("UOL", SaveOutcome::Duplicate).await;

        let g1 = monitor.source("G1").await.unwrap();
        assert!(g1.last_cycle_started.is_some());
        assert!(g1.last_success.is_none());
        assert_eq!(g1.failure_count(FailureKind::Network), 2);
        assert_eq!(g1.failure_count(FailureKind::Storage), 1);
        assert_eq!(g1.items_saved, 1);
        assert_eq!(monitor.source("UOL").await.unwrap().duplicates, 1);
    }

    #[tokio::test]
    async fn test_report_serializes_failure_kinds_as_names() {
        let monitor = HealthMonitor::new();
        monitor.record_failure("G1", FailureKind::Model).await;
        monitor.cycle_finished().await;

        let report = monitor.report().await;
        assert_eq!(report.cycles_completed, 1);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sources"]["G1"]["failures"]["model"], 1);
    }
}
