use std::fmt;
use nw_core::{Error, InferenceModel, Result, SummaryOptions};

/// Extractive summarizer: keeps the leading sentences of the text until
/// `min_len` words are reached, never exceeding `max_len` words.
///
/// Fully deterministic and local, so it is the default backend.
pub struct LeadModel;

impl fmt::Debug for LeadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadModel").finish()
    }
}

impl LeadModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LeadModel {
    fn default() -> Self {
        Self::new()
    }
}

fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = end;
        }
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

#[async_trait::async_trait]
impl InferenceModel for LeadModel {
    fn name(&self) -> &str {
        "lead"
    }

    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String> {
        let mut words: Vec<&str> = Vec::new();
        for sentence in sentences(text) {
            if words.len() >= options.min_len {
                break;
            }
            words.extend(sentence.split_whitespace());
        }
        words.truncate(options.max_len);

        if words.is_empty() {
            return Err(Error::Inference("nothing to summarize".to_string()));
        }
        Ok(words.join(" "))
    }
}
