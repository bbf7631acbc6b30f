use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use nw_core::{NewsPayload, NewsSink};

pub const DEFAULT_CAPACITY: usize = 100;

/// Messages pushed to real-time subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    NovaNoticia(NewsPayload),
}

/// Fan-out of freshly processed items to every connected subscriber.
/// Late joiners get no replay.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    tx: broadcast::Sender<PushEvent>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NewsSink for BroadcastHub {
    fn publish(&self, payload: NewsPayload) {
        match self.tx.send(PushEvent::NovaNoticia(payload)) {
            Ok(receivers) => debug!(receivers, "pushed nova_noticia"),
            Err(_) => debug!("no subscribers connected; event dropped"),
        }
    }
}
