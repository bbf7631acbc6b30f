use clap::{Args, Subcommand};
use nw_core::Result;
use crate::manager::IngestionManager;
use crate::scrapers::brazil::REGION;

#[derive(Args, Clone, Debug)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ScraperCommands {
    /// Run a single ingestion cycle over every source and exit
    Once,
    /// List configured sources
    List,
    /// Extract and summarize one article without saving it
    Url {
        url: String,
    },
}

pub async fn handle_command(args: ScraperArgs, manager: &IngestionManager) -> Result<()> {
    match args.command {
        ScraperCommands::Once => {
            let report = manager.run_cycle().await;
            println!(
                "{} sources ok, {} failed, {} links, {} new, {} duplicates, {} skipped",
                report.sources_ok,
                report.sources_failed,
                report.links,
                report.inserted,
                report.duplicates,
                report.skipped
            );
        }
        ScraperCommands::List => {
            println!("Configured sources ({}):", REGION);
            for source in manager.sources() {
                println!("  - {} ({})", source.name, source.url);
            }
        }
        ScraperCommands::Url { url } => {
            let (article, summary) = manager.preview(&url).await?;
            println!("📰 {}", article.title);
            println!("   {} characters of body", article.body_len());
            match summary {
                Some(summary) if summary.is_fallback() => println!("⚠️ {}", summary.text()),
                Some(summary) => println!("🤖 {}", summary.text()),
                None => println!("⏭️ Body too short to summarize"),
            }
        }
    }
    Ok(())
}
