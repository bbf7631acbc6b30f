use std::collections::HashSet;
use std::path::Path;
use serde::Deserialize;
use url::Url;
use nw_core::{Error, Result, Source};

#[derive(Debug, Deserialize)]
struct SourcesFile {
    sources: Vec<Source>,
}

/// Parse a `[[sources]]` list (`name`, `url`) preserving file order.
pub fn parse_sources(text: &str) -> Result<Vec<Source>> {
    let file: SourcesFile =
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid sources file: {}", e)))?;

    if file.sources.is_empty() {
        return Err(Error::Config("Sources file lists no sources".to_string()));
    }

    let mut names = HashSet::new();
    for source in &file.sources {
        if !names.insert(source.name.as_str()) {
            return Err(Error::Config(format!("Duplicate source name: {}", source.name)));
        }
        let url = Url::parse(&source.url)
            .map_err(|e| Error::InvalidUrl(format!("{} ({}): {}", source.url, source.name, e)))?;
        if url.host_str().is_none() {
            return Err(Error::InvalidUrl(format!("{} ({}) has no host", source.url, source.name)));
        }
    }

    Ok(file.sources)
}

pub fn load_sources(path: &Path) -> Result<Vec<Source>> {
    let text = std::fs::read_to_string(path)?;
    parse_sources(&text)
}
