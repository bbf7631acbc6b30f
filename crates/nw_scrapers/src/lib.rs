pub mod cli;
pub mod fetcher;
pub mod logging;
pub mod manager;
pub mod monitor;
pub mod scrapers;
pub mod sources;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use fetcher::Fetcher;
pub use manager::{CycleReport, FallbackPolicy, IngestionConfig, IngestionHandle, IngestionManager};
pub use monitor::{HealthMonitor, HealthReport, SourceHealth};
pub use scrapers::{HomepageScraper, Scraper};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use nw_core::{Article, Error, Result, Source};
}
