use std::fmt;
use std::sync::Arc;
use nw_core::{InferenceModel, SummaryOptions};
use tracing::warn;

/// Stored and broadcast in place of a summary when the model fails.
pub const FALLBACK_SUMMARY: &str = "Summary unavailable.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Generated(String),
    Fallback,
}

impl Summary {
    pub fn text(&self) -> &str {
        match self {
            Summary::Generated(text) => text,
            Summary::Fallback => FALLBACK_SUMMARY,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Summary::Fallback)
    }
}

/// Wraps an injected model and never fails: errors become `Summary::Fallback`.
#[derive(Clone)]
pub struct Summarizer {
    model: Arc<dyn InferenceModel>,
    options: SummaryOptions,
}

impl fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.model.name())
            .field("options", &self.options)
            .finish()
    }
}

impl Summarizer {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self::with_options(model, SummaryOptions::default())
    }

    pub fn with_options(model: Arc<dyn InferenceModel>, options: SummaryOptions) -> Self {
        Self { model, options }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn summarize(&self, body: &str) -> Summary {
        match self.model.summarize(body, &self.options).await {
            Ok(text) if !text.trim().is_empty() => Summary::Generated(text),
            Ok(_) => {
                warn!(kind = "model", model = self.model.name(), "model returned an empty summary; using fallback");
                Summary::Fallback
            }
            Err(e) => {
                warn!(kind = "model", model = self.model.name(), error = %e, "summarization failed; using fallback");
                Summary::Fallback
            }
        }
    }
}
