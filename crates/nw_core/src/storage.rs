use async_trait::async_trait;
use crate::types::{NewsItem, SaveOutcome};
use crate::Result;

#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Create the schema if missing. Safe to call on every start.
    async fn init(&self) -> Result<()>;

    /// Insert-or-ignore on (source, title, summary). Failures are logged by
    /// the backend and reported as `SaveOutcome::Failed`.
    async fn save(&self, source: &str, title: &str, summary: &str) -> SaveOutcome;

    /// All items, newest id first.
    async fn load_all(&self) -> Result<Vec<NewsItem>>;

    /// Delete everything but the newest `keep` items, returning the number removed.
    async fn prune(&self, keep: usize) -> Result<u64>;
}
