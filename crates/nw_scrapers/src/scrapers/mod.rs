use async_trait::async_trait;
use nw_core::{Article, Result, Source};
use crate::fetcher::Fetcher;

pub mod article;
pub mod brazil;
pub mod links;

pub use article::{extract, parse_article, MAX_BODY_CHARS};
pub use links::{discover, DEFAULT_MAX_LINKS};

#[async_trait]
pub trait Scraper: Send + Sync {
    /// The configured source this scraper walks
    fn source(&self) -> &Source;

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool;

    /// Candidate article links from the source's homepage
    async fn get_article_urls(&self) -> Result<Vec<String>>;

    /// Title and body of one article
    async fn scrape_article(&self, url: &str) -> Result<Article>;
}

/// Generic scraper: homepage link heuristic plus `<title>`/`<p>` extraction.
#[derive(Debug, Clone)]
pub struct HomepageScraper {
    source: Source,
    host: String,
    fetcher: Fetcher,
    max_links: usize,
}

impl HomepageScraper {
    pub fn new(source: Source, fetcher: Fetcher) -> Self {
        Self::with_max_links(source, fetcher, DEFAULT_MAX_LINKS)
    }

    pub fn with_max_links(source: Source, fetcher: Fetcher, max_links: usize) -> Self {
        let host = links::base_host(&source.url);
        Self {
            source,
            host,
            fetcher,
            max_links,
        }
    }
}

#[async_trait]
impl Scraper for HomepageScraper {
    fn source(&self) -> &Source {
        &self.source
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains(&self.host)
    }

    async fn get_article_urls(&self) -> Result<Vec<String>> {
        let html = self.fetcher.try_fetch(&self.source.url).await?;
        Ok(discover(&html, &self.source.url, self.max_links))
    }

    async fn scrape_article(&self, url: &str) -> Result<Article> {
        article::try_extract(&self.fetcher, url).await
    }
}

/// One [`HomepageScraper`] per source, in configuration order.
pub fn homepage_scrapers(sources: &[Source], fetcher: &Fetcher, max_links: usize) -> Vec<Box<dyn Scraper>> {
    sources
        .iter()
        .map(|source| {
            Box::new(HomepageScraper::with_max_links(source.clone(), fetcher.clone(), max_links)) as Box<dyn Scraper>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_can_handle() {
        let scraper = HomepageScraper::new(
            Source::new("G1", "https://g1.globo.com"),
            Fetcher::new().unwrap(),
        );
        assert!(scraper.can_handle("https://g1.globo.com/economia/noticia/x.ghtml"));
        assert!(!scraper.can_handle("https://www.cnnbrasil.com.br/politica/x/"));
    }

    #[tokio::test]
    async fn test_get_article_urls_from_homepage() {
        let server = MockServer::start().await;
        let homepage = format!(
            r#"<a href="{0}/">home</a><a href="{0}/brasil/noticia/one">one</a><a href="{0}/brasil/noticia/two">two</a>"#,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(homepage))
            .mount(&server)
            .await;

        let scraper = HomepageScraper::with_max_links(
            Source::new("Mock", server.uri()),
            Fetcher::new().unwrap(),
            1,
        );
        let urls = scraper.get_article_urls().await.unwrap();
        assert_eq!(urls, vec![format!("{}/brasil/noticia/one", server.uri())]);
    }

    #[tokio::test]
    async fn test_homepage_scrapers_follow_source_order() {
        let fetcher = Fetcher::new().unwrap();
        let scrapers = homepage_scrapers(&brazil::default_sources(), &fetcher, 3);
        let names: Vec<_> = scrapers.iter().map(|s| s.source().name.as_str()).collect();
        assert_eq!(names, vec!["G1", "CNN Brasil", "UOL", "Globo"]);
    }
}
