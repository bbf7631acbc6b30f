use std::collections::HashSet;
use crate::types::NewsItem;

/// Read-time dedup keyed on (title, summary), keeping the first occurrence.
///
/// Independent from the store's (source, title, summary) key: items with
/// the same text under different sources or ids collapse here.
pub fn dedup_by_content(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert((item.title.clone(), item.summary.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, source: &str, title: &str, summary: &str) -> NewsItem {
        NewsItem {
            id,
            source: source.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_dedup_keeps_newest_first_occurrence() {
        let items = vec![
            item(4, "UOL", "T", "S"),
            item(3, "G1", "T", "S"),
            item(2, "G1", "T", "other"),
            item(1, "G1", "T", "S"),
        ];
        let unique = dedup_by_content(items);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, 4);
        assert_eq!(unique[1].id, 2);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_by_content(Vec::new()).is_empty());
    }
}
