use std::time::Duration;

pub mod models;
pub mod summarizer;

pub const DEFAULT_MODEL_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend name: `lead` or `ollama`.
    pub model: String,
    pub model_url: Option<String>,
    pub model_name: Option<String>,
    /// Per-request timeout for HTTP backends. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "lead".to_string(),
            model_url: None,
            model_name: None,
            request_timeout: None,
        }
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::summarizer::{Summarizer, Summary, FALLBACK_SUMMARY};
    pub use super::Config;
    pub use nw_core::{InferenceModel, Result, SummaryOptions};
}

pub use models::create_model;
pub use summarizer::{Summarizer, Summary, FALLBACK_SUMMARY};
