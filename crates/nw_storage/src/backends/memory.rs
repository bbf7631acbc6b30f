use async_trait::async_trait;
use nw_core::{NewsItem, NewsStore, Result, SaveOutcome};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    items: Vec<NewsItem>,
    next_id: i64,
}

impl MemoryStore {
    pub fn save(&mut self, source: &str, title: &str, summary: &str) -> SaveOutcome {
        let exists = self
            .items
            .iter()
            .any(|i| i.source == source && i.title == title && i.summary == summary);
        if exists {
            return SaveOutcome::Duplicate;
        }

        self.next_id += 1;
        self.items.push(NewsItem {
            id: self.next_id,
            source: source.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
        });
        SaveOutcome::Inserted
    }

    pub fn load_all(&self) -> Vec<NewsItem> {
        let mut items = self.items.clone();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items
    }

    pub fn prune(&mut self, keep: usize) -> u64 {
        if self.items.len() <= keep {
            return 0;
        }
        self.items.sort_by(|a, b| b.id.cmp(&a.id));
        let removed = self.items.len() - keep;
        self.items.truncate(keep);
        removed as u64
    }
}

/// Process-local store with the same insert-or-ignore semantics as SQLite.
#[derive(Default)]
pub struct InMemoryStorage {
    store: RwLock<MemoryStore>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsStore for InMemoryStorage {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn save(&self, source: &str, title: &str, summary: &str) -> SaveOutcome {
        self.store.write().await.save(source, title, summary)
    }

    async fn load_all(&self) -> Result<Vec<NewsItem>> {
        Ok(self.store.read().await.load_all())
    }

    async fn prune(&self, keep: usize) -> Result<u64> {
        Ok(self.store.write().await.prune(keep))
    }
}
