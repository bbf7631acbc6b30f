pub mod dedup;
pub mod error;
pub mod models;
pub mod sink;
pub mod storage;
pub mod types;

pub use dedup::dedup_by_content;
pub use error::{Error, FailureKind, Result};
pub use models::{InferenceModel, SummaryOptions};
pub use sink::{NewsSink, NullSink};
pub use storage::NewsStore;
pub use types::{Article, NewsItem, NewsPayload, SaveOutcome, Source, NO_TITLE};
