use crate::models::{Book, FacetGroup, SortMode};
use crate::sorting::alphabetical_key;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

/// Distinct-book counts per facet value, computed over a filtered set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetCounts {
    pub subjects: HashMap<String, usize>,
    pub states: HashMap<String, usize>,
    pub districts: HashMap<String, usize>,
}

/// A facet value ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetValue {
    pub value: String,
    pub count: usize,
}

impl FacetCounts {
    pub fn get(&self, group: FacetGroup) -> &HashMap<String, usize> {
        match group {
            FacetGroup::Subject => &self.subjects,
            FacetGroup::State => &self.states,
            FacetGroup::District => &self.districts,
        }
    }

    /// Count for one value, zero when absent
    pub fn count(&self, group: FacetGroup, value: &str) -> usize {
        self.get(group).get(value).copied().unwrap_or(0)
    }

    /// Display list for one group
    pub fn values(&self, group: FacetGroup, mode: SortMode) -> Vec<FacetValue> {
        facet_values(self.get(group), mode)
    }
}

/// Count, for each facet value, how many distinct books carry it
/// Each book contributes at most 1 to any value, however often it repeats it
pub fn count_facets<'a, I>(books: I) -> FacetCounts
where
    I: IntoIterator<Item = &'a Book>,
{
    let mut counts = FacetCounts::default();

    for book in books {
        let subjects: BTreeSet<&str> = book.subjects.iter().map(String::as_str).collect();
        for subject in subjects {
            *counts.subjects.entry(subject.to_string()).or_default() += 1;
        }

        for state in book.distinct_states() {
            *counts.states.entry(state.to_string()).or_default() += 1;
        }

        for district in book.distinct_districts() {
            *counts.districts.entry(district.to_string()).or_default() += 1;
        }
    }

    counts
}

/// Turn a count map into a display list, dropping zero counts
/// Alphabetical order is case-insensitive on the whole value, raw string as tie-break
/// Count mode breaks ties alphabetically so output is deterministic
pub fn facet_values(counts: &HashMap<String, usize>, mode: SortMode) -> Vec<FacetValue> {
    let mut values: Vec<FacetValue> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(value, count)| FacetValue {
            value: value.clone(),
            count: *count,
        })
        .collect();

    match mode {
        SortMode::Count => values.sort_by_cached_key(|v| {
            (Reverse(v.count), alphabetical_key(&v.value), v.value.clone())
        }),
        SortMode::Alpha => {
            values.sort_by_cached_key(|v| (alphabetical_key(&v.value), v.value.clone()))
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ban;

    fn ban(state: &str, district: &str) -> Ban {
        Ban {
            state: state.to_string(),
            district: district.to_string(),
            ..Default::default()
        }
    }

    fn book(subjects: &[&str], bans: Vec<Ban>) -> Book {
        Book {
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            bans,
            ..Default::default()
        }
    }

    #[test]
    fn test_repeated_subject_counts_once() {
        let books = vec![book(&["a", "a", "b"], vec![])];
        let counts = count_facets(&books);

        assert_eq!(counts.count(FacetGroup::Subject, "a"), 1);
        assert_eq!(counts.count(FacetGroup::Subject, "b"), 1);
        assert_eq!(counts.count(FacetGroup::Subject, "c"), 0);
        assert!(!counts.subjects.contains_key("c"));
    }

    #[test]
    fn test_multiple_bans_in_same_state_count_once() {
        let books = vec![
            book(&[], vec![ban("Texas", "Katy ISD"), ban("Texas", "Katy ISD"), ban("Texas", "Llano")]),
            book(&[], vec![ban("Texas", "Llano")]),
        ];
        let counts = count_facets(&books);

        assert_eq!(counts.count(FacetGroup::State, "Texas"), 2);
        assert_eq!(counts.count(FacetGroup::District, "Katy ISD"), 1);
        assert_eq!(counts.count(FacetGroup::District, "Llano"), 2);
    }

    #[test]
    fn test_nation_counted_as_dodea() {
        let books = vec![book(&[], vec![ban("Nation", "DoDEA Schools")])];
        let counts = count_facets(&books);

        assert_eq!(counts.count(FacetGroup::State, "DoDEA"), 1);
        assert_eq!(counts.count(FacetGroup::State, "Nation"), 0);
        assert_eq!(counts.count(FacetGroup::District, "DoDEA Schools"), 1);
    }

    #[test]
    fn test_ban_without_state_adds_no_state_value() {
        let books = vec![book(&[], vec![ban("", "X")])];
        let counts = count_facets(&books);

        assert!(counts.states.is_empty());
        assert!(counts.values(FacetGroup::State, SortMode::Count).is_empty());
        assert_eq!(counts.count(FacetGroup::District, "X"), 1);
    }

    #[test]
    fn test_books_without_bans_or_subjects_contribute_nothing() {
        let books = vec![book(&[], vec![])];
        assert_eq!(count_facets(&books), FacetCounts::default());
    }

    #[test]
    fn test_counts_follow_filtered_set() {
        let books = vec![
            book(&["Fiction"], vec![ban("Texas", "X")]),
            book(&["Fiction", "History"], vec![ban("Florida", "Y")]),
        ];
        let filtered: Vec<&Book> = books.iter().filter(|b| b.has_subject("History")).collect();
        let counts = count_facets(filtered);

        assert_eq!(counts.count(FacetGroup::Subject, "Fiction"), 1);
        assert_eq!(counts.count(FacetGroup::State, "Texas"), 0);
        assert_eq!(counts.count(FacetGroup::State, "Florida"), 1);
    }

    #[test]
    fn test_facet_values_sorting() {
        let counts: HashMap<String, usize> = [
            ("Racism".to_string(), 6),
            ("The Holocaust".to_string(), 5),
            ("Identity".to_string(), 3),
            ("Empty".to_string(), 0),
        ]
        .into_iter()
        .collect();

        let by_count: Vec<String> = facet_values(&counts, SortMode::Count)
            .into_iter()
            .map(|v| v.value)
            .collect();
        assert_eq!(by_count, vec!["Racism", "The Holocaust", "Identity"]);

        let by_alpha: Vec<String> = facet_values(&counts, SortMode::Alpha)
            .into_iter()
            .map(|v| v.value)
            .collect();
        assert_eq!(by_alpha, vec!["Identity", "Racism", "The Holocaust"]);
    }

    #[test]
    fn test_alpha_order_keeps_leading_words() {
        let counts: HashMap<String, usize> = [
            "Los Angeles Unified",
            "Brevard",
            "La Porte ISD",
            "Katy ISD",
            "The Woodlands",
            "katy ISD",
        ]
        .into_iter()
        .map(|name| (name.to_string(), 1))
        .collect();

        let by_alpha: Vec<String> = facet_values(&counts, SortMode::Alpha)
            .into_iter()
            .map(|v| v.value)
            .collect();
        assert_eq!(
            by_alpha,
            vec![
                "Brevard",
                "Katy ISD",
                "katy ISD",
                "La Porte ISD",
                "Los Angeles Unified",
                "The Woodlands"
            ]
        );

        let by_count: Vec<String> = facet_values(&counts, SortMode::Count)
            .into_iter()
            .map(|v| v.value)
            .collect();
        assert_eq!(by_count, by_alpha);
    }
}
