use async_trait::async_trait;
use crate::Result;

/// Length bounds handed to the summarization backend, in words/tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub max_len: usize,
    pub min_len: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_len: 130,
            min_len: 30,
        }
    }
}

#[async_trait]
pub trait InferenceModel: Send + Sync {
    fn name(&self) -> &str;

    /// Produce an abstractive summary of `text`. Implementations must decode
    /// deterministically so the same input yields the same summary.
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String>;
}
