use std::fmt;
use std::sync::Arc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;
use nw_core::{Error, InferenceModel, Result, SummaryOptions};
use crate::{Config, DEFAULT_MODEL_URL};

pub const DEFAULT_MODEL_NAME: &str = "llama3.2";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    seed: u64,
    num_predict: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Summaries from a local Ollama server, decoded greedily.
pub struct OllamaModel {
    client: Arc<Client>,
    base_url: Url,
    model_name: String,
}

impl fmt::Debug for OllamaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaModel")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OllamaModel {
    pub fn new(config: &Config) -> Result<Self> {
        let raw = config.model_url.as_deref().unwrap_or(DEFAULT_MODEL_URL);
        let base_url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Inference(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            model_name: config
                .model_name
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
        })
    }

    fn endpoint(&self) -> Result<Url> {
        self.base_url
            .join("api/generate")
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

fn prompt(text: &str, options: &SummaryOptions) -> String {
    format!(
        "Summarize the following news article in {} to {} words. Reply with the summary only.\n\n{}\n\nSummary:",
        options.min_len, options.max_len, text
    )
}

#[async_trait::async_trait]
impl InferenceModel for OllamaModel {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model_name,
            prompt: prompt(text, options),
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                seed: 0,
                num_predict: options.max_len,
            },
        };

        let response = self
            .client
            .post(self.endpoint()?)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Inference(format!("Ollama rejected the request: {}", e)))?
            .json::<GenerateResponse>()
            .await?;

        let summary = response.response.trim().to_string();
        if summary.is_empty() {
            return Err(Error::Inference("Ollama returned an empty summary".to_string()));
        }
        tracing::debug!(model = %self.model_name, chars = summary.len(), "generated summary");
        Ok(summary)
    }
}
