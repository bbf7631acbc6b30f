use nw_core::Source;

pub const REGION: &str = "brazil";

/// The built-in source set, in crawl order.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("G1", "https://g1.globo.com"),
        Source::new("CNN Brasil", "https://www.cnnbrasil.com.br"),
        Source::new("UOL", "https://noticias.uol.com.br"),
        Source::new("Globo", "https://globo.com"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_are_unique_and_absolute() {
        let sources = default_sources();
        assert_eq!(sources.len(), 4);
        for (i, source) in sources.iter().enumerate() {
            assert!(source.url.starts_with("https://"));
            assert!(sources.iter().skip(i + 1).all(|other| other.name != source.name));
        }
    }
}
