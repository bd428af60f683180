//! Subject-by-geography report: which subjects dominate the bans in each state

use crate::facets::{count_facets, FacetValue};
use crate::grouping::group_books_by_state;
use crate::models::{Book, FacetGroup, SortMode};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSubjects {
    pub state: String,
    /// Distinct books banned in the state
    pub books: usize,
    /// Most common subjects among those books, by distinct-book count
    pub top_subjects: Vec<FacetValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectGeographyReport {
    pub total_books: usize,
    /// Subjects across every book in the report
    pub top_subjects: Vec<FacetValue>,
    pub states: Vec<StateSubjects>,
}

/// Build the report, keeping `top_n` subjects per state
pub fn subject_geography_report<'a, I>(books: I, top_n: usize) -> SubjectGeographyReport
where
    I: IntoIterator<Item = &'a Book>,
{
    let books: Vec<&Book> = books.into_iter().collect();

    let mut top_subjects = count_facets(books.iter().copied()).values(FacetGroup::Subject, SortMode::Count);
    top_subjects.truncate(top_n);

    let states = group_books_by_state(books.iter().copied())
        .into_iter()
        .map(|(state, state_books)| {
            let mut subjects = count_facets(state_books.iter().copied())
                .values(FacetGroup::Subject, SortMode::Count);
            subjects.truncate(top_n);

            StateSubjects {
                state,
                books: state_books.len(),
                top_subjects: subjects,
            }
        })
        .collect();

    SubjectGeographyReport {
        total_books: books.len(),
        top_subjects,
        states,
    }
}
