use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use nw_core::{Article, Error, FailureKind, NewsPayload, NewsSink, NewsStore, Result, SaveOutcome, Source};
use nw_inference::{Summarizer, Summary};
use crate::monitor::HealthMonitor;
use crate::scrapers::article::failure_kind;
use crate::scrapers::Scraper;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Bodies must be longer than this many characters to be summarized.
pub const MIN_BODY_CHARS: usize = 200;

/// What to do with an item whose summary is the fallback sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FallbackPolicy {
    /// Save and broadcast the sentinel like any other summary.
    #[default]
    Persist,
    /// Drop the item for this cycle.
    Skip,
}

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub interval: Duration,
    pub fallback_policy: FallbackPolicy,
    /// Keep only the newest N items after each cycle. `None` keeps everything.
    pub retain: Option<usize>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            fallback_policy: FallbackPolicy::default(),
            retain: None,
        }
    }
}

/// Tally of one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub links: usize,
    pub summarized: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub save_failures: usize,
    pub skipped: usize,
    pub published: usize,
}

/// Drives crawl → discover → extract → summarize → save → broadcast, one
/// source and one link at a time.
pub struct IngestionManager {
    scrapers: Vec<Box<dyn Scraper>>,
    summarizer: Summarizer,
    storage: Arc<dyn NewsStore>,
    sink: Arc<dyn NewsSink>,
    monitor: HealthMonitor,
    config: IngestionConfig,
}

impl IngestionManager {
    pub fn new(
        storage: Arc<dyn NewsStore>,
        summarizer: Summarizer,
        sink: Arc<dyn NewsSink>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            scrapers: Vec::new(),
            summarizer,
            storage,
            sink,
            monitor: HealthMonitor::new(),
            config,
        }
    }

    pub fn add_scraper(&mut self, scraper: Box<dyn Scraper>) {
        self.scrapers.push(scraper);
    }

    pub fn with_scrapers(mut self, scrapers: Vec<Box<dyn Scraper>>) -> Self {
        self.scrapers.extend(scrapers);
        self
    }

    pub fn sources(&self) -> Vec<&Source> {
        self.scrapers.iter().map(|s| s.source()).collect()
    }

    pub fn monitor(&self) -> HealthMonitor {
        self.monitor.clone()
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    fn get_scraper_for_url(&self, url: &str) -> Result<&dyn Scraper> {
        self.scrapers
            .iter()
            .find(|s| s.can_handle(url))
            .map(|s| s.as_ref())
            .ok_or_else(|| Error::Config(format!("No configured source handles URL: {}", url)))
    }

    /// Extract and summarize one URL without saving or broadcasting.
    pub async fn preview(&self, url: &str) -> Result<(Article, Option<Summary>)> {
        let scraper = self.get_scraper_for_url(url)?;
        let article = scraper.scrape_article(url).await?;
        let summary = match article.body.as_deref() {
            Some(body) if article.body_len() > MIN_BODY_CHARS => Some(self.summarizer.summarize(body).await),
            _ => None,
        };
        Ok((article, summary))
    }

    /// One full pass over every source, in configuration order.
    pub async fn run_cycle(&self) -> CycleReport {
        self.run_cycle_until(None).await
    }

    async fn run_cycle_until(&self, shutdown: Option<&watch::Receiver<bool>>) -> CycleReport {
        let mut report = CycleReport::default();

        for scraper in &self.scrapers {
            if is_stopped(shutdown) {
                break;
            }
            self.process_source(scraper.as_ref(), &mut report, shutdown).await;
        }

        if is_stopped(shutdown) {
            info!(sources_ok = report.sources_ok, "Cycle interrupted by stop signal");
            return report;
        }

        if let Some(keep) = self.config.retain {
            match self.storage.prune(keep).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, keep, "🧹 Pruned old items"),
                Err(e) => warn!(kind = "storage", error = %e, "retention pass failed"),
            }
        }

        self.monitor.cycle_finished().await;
        info!(
            sources_ok = report.sources_ok,
            sources_failed = report.sources_failed,
            links = report.links,
            inserted = report.inserted,
            duplicates = report.duplicates,
            skipped = report.skipped,
            "✅ Cycle finished"
        );
        report
    }

    async fn process_source(
        &self,
        scraper: &dyn Scraper,
        report: &mut CycleReport,
        shutdown: Option<&watch::Receiver<bool>>,
    ) {
        let source = scraper.source();
        self.monitor.source_started(&source.name).await;
        info!(source = %source.name, url = %source.url, "🦗 Crawling source");

        let links = match scraper.get_article_urls().await {
            Ok(links) => links,
            Err(e) => {
                warn!(kind = "network", source = %source.name, url = %source.url, error = %e, "homepage fetch failed; skipping source");
                self.monitor.record_failure(&source.name, FailureKind::Network).await;
                report.sources_failed += 1;
                return;
            }
        };

        debug!(source = %source.name, count = links.len(), "links discovered");
        self.monitor.links_discovered(&source.name, links.len()).await;
        report.links += links.len();

        for link in &links {
            if is_stopped(shutdown) {
                return;
            }
            self.process_link(scraper, link, report).await;
        }

        self.monitor.source_succeeded(&source.name).await;
        report.sources_ok += 1;
    }

    async fn process_link(&self, scraper: &dyn Scraper, url: &str, report: &mut CycleReport) {
        let source = &scraper.source().name;

        let article = match scraper.scrape_article(url).await {
            Ok(article) => article,
            Err(e) => {
                let kind = failure_kind(&e);
                warn!(kind = %kind, source = %source, url, error = %e, "article extraction failed");
                self.monitor.record_failure(source, kind).await;
                report.skipped += 1;
                return;
            }
        };

        let body = match article.body.as_deref() {
            Some(body) if article.body_len() > MIN_BODY_CHARS => body,
            _ => {
                debug!(source = %source, url, chars = article.body_len(), "body too short; skipping");
                self.monitor.record_short_body(source).await;
                report.skipped += 1;
                return;
            }
        };

        info!(source = %source, title = %article.title, "🤖 Summarizing");
        let summary = self.summarizer.summarize(body).await;
        report.summarized += 1;
        if summary.is_fallback() {
            self.monitor.record_failure(source, FailureKind::Model).await;
            if self.config.fallback_policy == FallbackPolicy::Skip {
                info!(source = %source, url, "fallback summary; item skipped");
                self.monitor.record_fallback_skipped(source).await;
                report.skipped += 1;
                return;
            }
        }

        let outcome = self.storage.save(source, &article.title, summary.text()).await;
        self.monitor.record_save(source, outcome).await;
        match outcome {
            SaveOutcome::Inserted => report.inserted += 1,
            SaveOutcome::Duplicate => report.duplicates += 1,
            SaveOutcome::Failed => report.save_failures += 1,
        }

        self.sink.publish(NewsPayload::new(source, &article.title, summary.text()));
        report.published += 1;
        info!(source = %source, title = %article.title, outcome = ?outcome, "📰 Item processed");
    }

    /// Cycle forever, sleeping `interval` between cycles, until `shutdown`
    /// turns true or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(sources = self.scrapers.len(), interval_secs = self.config.interval.as_secs(), "Ingestion loop started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            info!("Starting ingestion cycle");
            self.run_cycle_until(Some(&shutdown)).await;

            info!("⏳ Waiting {}s before next cycle", self.config.interval.as_secs());
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Ingestion loop stopped");
    }

    /// Run the loop on its own task.
    pub fn spawn(self) -> IngestionHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let monitor = self.monitor();
        let task = tokio::spawn(async move { self.run(stop_rx).await });
        IngestionHandle { stop_tx, task, monitor }
    }
}

pub struct IngestionHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    monitor: HealthMonitor,
}

impl IngestionHandle {
    pub fn monitor(&self) -> HealthMonitor {
        self.monitor.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop and wait for it to finish its current step.
    pub async fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(true);
        self.task
            .await
            .map_err(|e| Error::External(anyhow::anyhow!("ingestion task failed: {}", e)))
    }
}

fn is_stopped(shutdown: Option<&watch::Receiver<bool>>) -> bool {
    shutdown.map(|rx| *rx.borrow()).unwrap_or(false)
}
