use crate::error::{Error, Result};
use crate::models::{Book, FacetGroup, Selection};
use tracing::debug;

/// Parse facet strings in the format "group=value" into a selection
/// e.g. `subject=Fiction`, `state=DoDEA`, `district=Katy ISD`
pub fn parse_facet_selection(facet_strings: &[String]) -> Result<Selection> {
    let mut selection = Selection::new();

    for facet_str in facet_strings {
        let (group, value) = facet_str.split_once('=').ok_or_else(|| {
            Error::InvalidInput(format!(
                "invalid facet '{}', expected 'group=value'",
                facet_str
            ))
        })?;

        let value = value.trim();
        if value.is_empty() {
            return Err(Error::InvalidInput(format!(
                "facet '{}' has an empty value",
                facet_str
            )));
        }

        selection.select(group.parse::<FacetGroup>()?, value);
    }

    Ok(selection)
}

/// Filter books by the selection, then order by ban count descending
/// The sort is stable so books with equal ban counts keep their input order
pub fn filter_books<'a>(books: &'a [Book], selection: &Selection) -> Vec<&'a Book> {
    let mut filtered: Vec<&Book> = books
        .iter()
        .filter(|book| matches_selection(book, selection))
        .collect();

    filtered.sort_by(|a, b| b.ban_count().cmp(&a.ban_count()));

    debug!(
        total = books.len(),
        matched = filtered.len(),
        "applied selection"
    );
    filtered
}

/// Check if a book satisfies every active clause of the selection
/// AND across facet groups, and AND across values within a group
pub fn matches_selection(book: &Book, selection: &Selection) -> bool {
    matches_query(book, &selection.query)
        && matches_subjects(book, selection)
        && matches_states(book, selection)
        && matches_districts(book, selection)
}

/// Case-insensitive substring match against title or author
/// An empty (or whitespace) query matches everything
pub fn matches_query(book: &Book, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    };

    contains(&book.title) || contains(&book.author)
}

fn matches_subjects(book: &Book, selection: &Selection) -> bool {
    if selection.subjects.is_empty() {
        return true;
    }
    !book.subjects.is_empty() && selection.subjects.iter().all(|s| book.has_subject(s))
}

fn matches_states(book: &Book, selection: &Selection) -> bool {
    if selection.states.is_empty() {
        return true;
    }
    !book.bans.is_empty() && selection.states.iter().all(|s| book.banned_in_state(s))
}

fn matches_districts(book: &Book, selection: &Selection) -> bool {
    if selection.districts.is_empty() {
        return true;
    }
    !book.bans.is_empty() && selection.districts.iter().all(|d| book.banned_in_district(d))
}

/// Check if any facet or query is active
pub fn has_filters(selection: &Selection) -> bool {
    !selection.query.trim().is_empty()
        || !selection.subjects.is_empty()
        || !selection.states.is_empty()
        || !selection.districts.is_empty()
}
