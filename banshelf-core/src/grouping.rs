use crate::models::{normalize_state, Book};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A school district within a state (state already normalized)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DistrictKey {
    pub state: String,
    pub district: String,
}

/// One banned title as listed under a district
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictEntry<'a> {
    pub book: &'a Book,
    pub date: Option<&'a str>,
    pub ban_status: Option<&'a str>,
}

/// Per-state figures driving the choropleth
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateTally {
    pub state: String,
    /// Distinct books with at least one ban in the state
    pub books: usize,
    /// Every ban event in the state
    pub bans: usize,
    /// Distinct districts with at least one ban
    pub districts: usize,
}

/// Group books by normalized ban state
/// A book appears once per state, however many bans it has there
pub fn group_books_by_state<'a, I>(books: I) -> BTreeMap<String, Vec<&'a Book>>
where
    I: IntoIterator<Item = &'a Book>,
{
    let mut groups: BTreeMap<String, Vec<&Book>> = BTreeMap::new();

    for book in books {
        for state in book.distinct_states() {
            groups.entry(state.to_string()).or_default().push(book);
        }
    }

    groups
}

/// Group ban events by district, one entry per ban
pub fn group_books_by_district<'a, I>(books: I) -> BTreeMap<DistrictKey, Vec<DistrictEntry<'a>>>
where
    I: IntoIterator<Item = &'a Book>,
{
    let mut groups: BTreeMap<DistrictKey, Vec<DistrictEntry<'a>>> = BTreeMap::new();

    for book in books {
        for ban in &book.bans {
            let key = DistrictKey {
                state: normalize_state(&ban.state).to_string(),
                district: ban.district.clone(),
            };
            groups.entry(key).or_default().push(DistrictEntry {
                book,
                date: ban.date.as_deref(),
                ban_status: ban.ban_status.as_deref(),
            });
        }
    }

    groups
}

/// Per-state tallies, ordered by state name
pub fn state_ban_tallies<'a, I>(books: I) -> Vec<StateTally>
where
    I: IntoIterator<Item = &'a Book>,
{
    let mut tallies: BTreeMap<&str, (usize, usize, BTreeSet<&str>)> = BTreeMap::new();

    for book in books {
        for state in book.distinct_states() {
            tallies.entry(state).or_default().0 += 1;
        }
        for ban in &book.bans {
            let state = ban.display_state();
            if state.trim().is_empty() {
                continue;
            }
            let entry = tallies.entry(state).or_default();
            entry.1 += 1;
            if !ban.district.trim().is_empty() {
                entry.2.insert(ban.district.as_str());
            }
        }
    }

    tallies
        .into_iter()
        .map(|(state, (books, bans, districts))| StateTally {
            state: state.to_string(),
            books,
            bans,
            districts: districts.len(),
        })
        .collect()
}
