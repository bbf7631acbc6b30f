use std::collections::HashSet;
use scraper::{Html, Selector};
use url::Url;

pub const DEFAULT_MAX_LINKS: usize = 3;

/// A URL split on `/` must yield more than this many pieces to count as an
/// article permalink. `https://host/a/b` yields five.
const SHALLOW_URL_PIECES: usize = 4;

/// The host part of a source's base URL, used as a substring filter.
pub fn base_host(base_url: &str) -> String {
    match Url::parse(base_url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        Some(host) => host,
        None => base_url
            .split_once("//")
            .map(|(_, rest)| rest)
            .unwrap_or(base_url)
            .trim_end_matches('/')
            .to_string(),
    }
}

/// Deep, absolute, untracked link on the source's own host.
pub fn is_article_link(link: &str, host: &str) -> bool {
    link.starts_with("http")
        && link.contains(host)
        && !link.contains("utm_")
        && !link.contains('#')
        && link.split('/').count() > SHALLOW_URL_PIECES
}

/// Pick up to `max_links` candidate article links from a homepage, in
/// document order and without duplicates.
pub fn discover(html: &str, base_url: &str, max_links: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let host = base_host(base_url);
    let mut seen = HashSet::new();
    document
        .select(&anchor)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_article_link(href, &host))
        .filter(|href| seen.insert(href.to_string()))
        .take(max_links)
        .map(str::to_string)
        .collect()
}
