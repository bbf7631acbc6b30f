use scraper::{Html, Selector};
use tracing::warn;
use nw_core::{Article, Error, FailureKind, Result, NO_TITLE};
use crate::fetcher::Fetcher;

pub const MAX_BODY_CHARS: usize = 1024;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse(format!("Invalid selector {}: {}", css, e)))
}

/// First `max` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Title and paragraph text of an article page.
///
/// A document with neither a `<title>` nor any `<p>` is not an article
/// page and is reported as a parse error.
pub fn parse_article(url: &str, html: &str) -> Result<Article> {
    let document = Html::parse_document(html);

    let title_el = document.select(&selector("title")?).next();
    let title = title_el
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let paragraphs: Vec<String> = document
        .select(&selector("p")?)
        .map(|el| el.text().collect::<String>())
        .collect();

    if title_el.is_none() && paragraphs.is_empty() {
        return Err(Error::Parse(format!("{} has no title or paragraph elements", url)));
    }

    let body = paragraphs.join(" ");
    let body = truncate_chars(body.trim(), MAX_BODY_CHARS).to_string();

    Ok(Article {
        url: url.to_string(),
        title,
        body: Some(body),
    })
}

/// How a failed extraction is counted: a page that parsed to nothing is a
/// parse failure, everything else happened on the way there.
pub fn failure_kind(error: &Error) -> FailureKind {
    match error {
        Error::Parse(_) => FailureKind::Parse,
        _ => FailureKind::Network,
    }
}

pub async fn try_extract(fetcher: &Fetcher, url: &str) -> Result<Article> {
    let html = fetcher.try_fetch(url).await?;
    parse_article(url, &html)
}

/// Never fails: fetch or parse problems give `("no title", None)`.
///
/// Thin wrapper over [`try_extract`] for callers that only want the
/// article. The ingestion loop uses `try_extract` so it can count the
/// failure kind.
pub async fn extract(fetcher: &Fetcher, url: &str) -> Article {
    match try_extract(fetcher, url).await {
        Ok(article) => article,
        Err(e) => {
            warn!(kind = %failure_kind(&e), url, error = %e, "could not extract article");
            Article::unavailable(url)
        }
    }
}
