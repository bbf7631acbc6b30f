use std::sync::Arc;
use nw_core::{Error, InferenceModel, Result};
use tracing::info;
use crate::Config;

pub mod lead;
pub mod ollama;

pub use lead::LeadModel;
pub use ollama::OllamaModel;

pub fn available_models() -> &'static [&'static str] {
    &["lead", "ollama"]
}

/// Construct the backend named in `config`. Called once at startup; the
/// resulting model is shared by every ingestion cycle.
pub fn create_model(config: &Config) -> Result<Arc<dyn InferenceModel>> {
    let model: Arc<dyn InferenceModel> = match config.model.as_str() {
        "lead" => Arc::new(LeadModel::new()) as Arc<dyn InferenceModel>,
        "ollama" => Arc::new(OllamaModel::new(config)?) as Arc<dyn InferenceModel>,
        other => {
            return Err(Error::Config(format!(
                "Unknown model '{}' (available: {})",
                other,
                available_models().join(", ")
            )))
        }
    };
    info!(model = model.name(), "🧠 Inference model ready");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_models() {
        let lead = create_model(&Config::default()).unwrap();
        assert_eq!(lead.name(), "lead");

        let config = Config {
            model: "ollama".to_string(),
            ..Config::default()
        };
        assert_eq!(create_model(&config).unwrap().name(), "ollama");
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let config = Config {
            model: "bart".to_string(),
            ..Config::default()
        };
        assert!(matches!(create_model(&config), Err(Error::Config(_))));
    }
}
