use crate::types::NewsPayload;

/// Push target for freshly processed items.
pub trait NewsSink: Send + Sync {
    fn publish(&self, payload: NewsPayload);
}

/// Sink that drops everything, for one-shot runs without subscribers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NewsSink for NullSink {
    fn publish(&self, _payload: NewsPayload) {}
}
