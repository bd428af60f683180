use crate::models::Book;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Re-order an already filtered list by title (library science collation)
/// Books without a title sort last; ties keep ban-count order
pub fn sort_books_by_title(books: &mut [&Book]) {
    books.sort_by(|a, b| match (&a.title, &b.title) {
        (Some(a_title), Some(b_title)) => compare_labels(a_title, b_title),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Compare two display labels alphabetically
/// Primary key is the normalized form, the raw string breaks ties
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    normalize_for_sorting(a)
        .cmp(&normalize_for_sorting(b))
        .then_with(|| a.cmp(b))
}

/// Case-folded key for plain alphabetical order of facet values
/// Unicode NFD, lowercase, whitespace collapsed; leading words are kept
pub fn alphabetical_key(s: &str) -> String {
    s.nfd()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize string for library science sorting
/// - Strip leading articles (a, an, the)
/// - Normalize unicode (NFD then lowercase)
/// - Collapse whitespace
pub fn normalize_for_sorting(s: &str) -> String {
    let without_articles = strip_leading_articles(s);

    let normalized: String = without_articles.nfd().collect::<String>().to_lowercase();

    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip leading articles following library science conventions
/// Supports: a, an, the (English) and common articles in other languages
pub fn strip_leading_articles(s: &str) -> String {
    static ARTICLES: OnceLock<Regex> = OnceLock::new();
    let re = ARTICLES.get_or_init(|| {
        Regex::new(r"^(?i)(the|a|an|der|die|das|le|la|les|el|los|las|il|lo|gli|un|une|een)\s+")
            .unwrap()
    });
    re.replace(s.trim_start(), "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_articles() {
        assert_eq!(strip_leading_articles("The Bluest Eye"), "Bluest Eye");
        assert_eq!(strip_leading_articles("A Court of Mist and Fury"), "Court of Mist and Fury");
        assert_eq!(strip_leading_articles("Theater"), "Theater");
    }

    #[test]
    fn test_normalize_for_sorting() {
        assert_eq!(normalize_for_sorting("  The   Hate U  Give "), "hate u give");
        assert_eq!(normalize_for_sorting("Él"), normalize_for_sorting("él"));
    }

    #[test]
    fn test_alphabetical_key_keeps_leading_words() {
        assert_eq!(alphabetical_key("Los  Angeles Unified"), "los angeles unified");
        assert_eq!(alphabetical_key("The Woodlands"), "the woodlands");
        assert!(alphabetical_key("Brevard") < alphabetical_key("Los Angeles Unified"));
    }

    #[test]
    fn test_compare_labels() {
        assert_eq!(compare_labels("The Holocaust", "Identity"), Ordering::Less);
        assert_eq!(compare_labels("racism", "Racism"), Ordering::Greater);
        assert_eq!(compare_labels("Racism", "Racism"), Ordering::Equal);
    }

    #[test]
    fn test_sort_books_by_title() {
        let titled = |id: &str, title: Option<&str>| Book {
            id: id.to_string(),
            title: title.map(str::to_string),
            ..Default::default()
        };
        let books = vec![
            titled("1", Some("The Perks of Being a Wallflower")),
            titled("2", None),
            titled("3", Some("Beloved")),
        ];
        let mut refs: Vec<&Book> = books.iter().collect();
        sort_books_by_title(&mut refs);

        let ids: Vec<&str> = refs.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }
}
