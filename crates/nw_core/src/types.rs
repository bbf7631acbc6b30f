use serde::{Deserialize, Serialize};

/// Placeholder title for pages without a usable `<title>`.
pub const NO_TITLE: &str = "no title";

/// A configured news origin. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Title and plain-text body pulled from one article page.
///
/// `body` is `None` when the page could not be fetched at all, and may be
/// an empty string when the page had no paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub body: Option<String>,
}

impl Article {
    pub fn unavailable(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: NO_TITLE.to_string(),
            body: None,
        }
    }

    /// Number of characters in the body, zero when absent.
    pub fn body_len(&self) -> usize {
        self.body.as_deref().map(|b| b.chars().count()).unwrap_or(0)
    }
}

/// A persisted summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub source: String,
    pub title: String,
    pub summary: String,
}

/// Wire shape shared by the read API and the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPayload {
    #[serde(rename = "fonte")]
    pub source: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumo")]
    pub summary: String,
}

impl NewsPayload {
    pub fn new(source: &str, title: &str, summary: &str) -> Self {
        Self {
            source: source.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
        }
    }
}

impl From<NewsItem> for NewsPayload {
    fn from(item: NewsItem) -> Self {
        Self {
            source: item.source,
            title: item.title,
            summary: item.summary,
        }
    }
}

/// Result of an insert-or-ignore save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Duplicate,
    Failed,
}
