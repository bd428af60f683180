use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Raw state value the dataset uses for military base schools
pub const NATION_STATE: &str = "Nation";

/// Label shown (and filtered on) in place of [`NATION_STATE`]
pub const DODEA_LABEL: &str = "DoDEA";

/// Map a raw ban state to the label used for facets and display
pub fn normalize_state(raw: &str) -> &str {
    if raw == NATION_STATE {
        DODEA_LABEL
    } else {
        raw
    }
}

/// A single book record, normalized at load time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "lenient::ban_list")]
    pub bans: Vec<Ban>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub oclc: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lccn: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub page_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub popularity_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub total_holding_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub total_editions: Option<u64>,
}

/// One ban event, owned by its book
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ban {
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub district: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ban_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
}

impl Ban {
    /// State label with the DoDEA alias applied
    pub fn display_state(&self) -> &str {
        normalize_state(&self.state)
    }
}

impl Book {
    pub fn ban_count(&self) -> usize {
        self.bans.len()
    }

    /// Title for display, falling back to the id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Distinct subjects in first-seen order
    pub fn distinct_subjects(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.subjects
            .iter()
            .map(String::as_str)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Distinct normalized states across all bans, blanks skipped
    pub fn distinct_states(&self) -> BTreeSet<&str> {
        self.bans
            .iter()
            .map(Ban::display_state)
            .filter(|state| !state.trim().is_empty())
            .collect()
    }

    /// Distinct raw districts across all bans, blanks skipped
    pub fn distinct_districts(&self) -> BTreeSet<&str> {
        self.bans
            .iter()
            .map(|ban| ban.district.as_str())
            .filter(|district| !district.trim().is_empty())
            .collect()
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// True when some ban's normalized state equals `state`
    pub fn banned_in_state(&self, state: &str) -> bool {
        self.bans.iter().any(|ban| ban.display_state() == state)
    }

    pub fn banned_in_district(&self, district: &str) -> bool {
        self.bans.iter().any(|ban| ban.district == district)
    }
}

/// The three filterable dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetGroup {
    Subject,
    State,
    District,
}

impl FacetGroup {
    pub const ALL: [FacetGroup; 3] = [FacetGroup::Subject, FacetGroup::State, FacetGroup::District];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetGroup::Subject => "subject",
            FacetGroup::State => "state",
            FacetGroup::District => "district",
        }
    }
}

impl fmt::Display for FacetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "subject" | "subjects" => Ok(FacetGroup::Subject),
            "state" | "states" => Ok(FacetGroup::State),
            "district" | "districts" => Ok(FacetGroup::District),
            other => Err(Error::InvalidInput(format!("unknown facet group '{}'", other))),
        }
    }
}

/// Ordering of a facet value list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Count descending
    #[default]
    Count,
    /// Alphabetical ascending
    Alpha,
}

impl SortMode {
    pub fn toggled(self) -> Self {
        match self {
            SortMode::Count => SortMode::Alpha,
            SortMode::Alpha => SortMode::Count,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Count => f.write_str("count"),
            SortMode::Alpha => f.write_str("alpha"),
        }
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "count" => Ok(SortMode::Count),
            "alpha" | "alphabetical" | "name" => Ok(SortMode::Alpha),
            other => Err(Error::InvalidInput(format!(
                "unknown sort mode '{}' (expected 'count' or 'alpha')",
                other
            ))),
        }
    }
}

/// Active facet selections plus the free-text query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub query: String,
    pub subjects: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub districts: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self, group: FacetGroup) -> &BTreeSet<String> {
        match group {
            FacetGroup::Subject => &self.subjects,
            FacetGroup::State => &self.states,
            FacetGroup::District => &self.districts,
        }
    }

    fn values_mut(&mut self, group: FacetGroup) -> &mut BTreeSet<String> {
        match group {
            FacetGroup::Subject => &mut self.subjects,
            FacetGroup::State => &mut self.states,
            FacetGroup::District => &mut self.districts,
        }
    }

    /// Add a value to a facet group; returns false if it was already selected
    pub fn select(&mut self, group: FacetGroup, value: impl Into<String>) -> bool {
        self.values_mut(group).insert(value.into())
    }

    /// Returns false if the value was not selected
    pub fn remove(&mut self, group: FacetGroup, value: &str) -> bool {
        self.values_mut(group).remove(value)
    }

    /// Select the value if absent, deselect it if present
    pub fn toggle(&mut self, group: FacetGroup, value: &str) {
        if !self.remove(group, value) {
            self.select(group, value);
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.subjects.clear();
        self.states.clear();
        self.districts.clear();
    }
}

/// Lenient field decoders: malformed values become absent, never errors
mod lenient {
    use super::Ban;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(scalar_to_string(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(scalar_to_string(Value::deserialize(d)?))
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Accepts an array of strings or a single string
    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(values) => values.into_iter().filter_map(scalar_to_string).collect(),
            value @ Value::String(_) => scalar_to_string(value).into_iter().collect(),
            _ => Vec::new(),
        })
    }

    pub fn ban_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Ban>, D::Error> {
        let Value::Array(values) = Value::deserialize(d)? else {
            return Ok(Vec::new());
        };

        Ok(values
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_tolerates_missing_fields() {
        let book: Book = serde_json::from_value(json!({ "id": 7 })).unwrap();
        assert_eq!(book.id, "7");
        assert!(book.title.is_none());
        assert!(book.subjects.is_empty());
        assert!(book.bans.is_empty());
        assert_eq!(book.ban_count(), 0);
    }

    #[test]
    fn test_subjects_as_single_string() {
        let book: Book =
            serde_json::from_value(json!({ "id": "a", "subjects": "Fiction" })).unwrap();
        assert_eq!(book.subjects, vec!["Fiction".to_string()]);
    }

    #[test]
    fn test_non_array_bans_become_empty() {
        let book: Book =
            serde_json::from_value(json!({ "id": "a", "bans": "none", "subjects": null })).unwrap();
        assert!(book.bans.is_empty());
        assert!(book.subjects.is_empty());
    }

    #[test]
    fn test_numeric_identifiers_become_strings() {
        let book: Book = serde_json::from_value(json!({
            "id": 12,
            "isbn": 9780061120084u64,
            "oclc": "  ",
            "pageCount": "336"
        }))
        .unwrap();
        assert_eq!(book.isbn.as_deref(), Some("9780061120084"));
        assert!(book.oclc.is_none());
        assert_eq!(book.page_count, Some(336));
    }

    #[test]
    fn test_malformed_ban_entries_are_skipped() {
        let book: Book = serde_json::from_value(json!({
            "id": "a",
            "bans": [
                { "state": "Texas", "district": "Katy ISD", "ban_status": "Banned" },
                "garbage",
                { "district": "Orphan District" }
            ]
        }))
        .unwrap();
        assert_eq!(book.ban_count(), 2);
        assert_eq!(book.bans[1].state, "");
        assert_eq!(book.bans[0].ban_status.as_deref(), Some("Banned"));
    }

    #[test]
    fn test_nation_displays_as_dodea() {
        let ban = Ban {
            state: "Nation".to_string(),
            district: "DoDEA Schools".to_string(),
            ..Default::default()
        };
        assert_eq!(ban.display_state(), "DoDEA");
        assert_eq!(normalize_state("Florida"), "Florida");
    }

    #[test]
    fn test_blank_states_and_districts_are_skipped() {
        let book: Book = serde_json::from_value(json!({
            "id": "a",
            "bans": [{ "district": "X" }, { "state": "Texas", "district": " " }]
        }))
        .unwrap();

        assert_eq!(book.distinct_states().into_iter().collect::<Vec<_>>(), vec!["Texas"]);
        assert_eq!(book.distinct_districts().into_iter().collect::<Vec<_>>(), vec!["X"]);
        assert_eq!(book.ban_count(), 2);
    }

    #[test]
    fn test_distinct_subjects_keeps_first_seen_order() {
        let book = Book {
            subjects: vec!["b".into(), "a".into(), "b".into()],
            ..Default::default()
        };
        assert_eq!(book.distinct_subjects(), vec!["b", "a"]);
    }

    #[test]
    fn test_selection_toggle() {
        let mut selection = Selection::new();
        selection.toggle(FacetGroup::State, "Texas");
        assert!(selection.states.contains("Texas"));
        selection.toggle(FacetGroup::State, "Texas");
        assert!(selection.states.is_empty());
    }

    #[test]
    fn test_sort_mode_parsing() {
        assert_eq!("count".parse::<SortMode>().unwrap(), SortMode::Count);
        assert_eq!("Alphabetical".parse::<SortMode>().unwrap(), SortMode::Alpha);
        assert!("random".parse::<SortMode>().is_err());
        assert_eq!(SortMode::Count.toggled(), SortMode::Alpha);
    }
}
