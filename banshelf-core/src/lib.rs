// Public modules
pub mod audit;
pub mod error;
pub mod facets;
pub mod filtering;
pub mod grouping;
pub mod io;
pub mod models;
pub mod pagination;
pub mod report;
pub mod session;
pub mod sorting;
pub mod store;

// Re-export commonly used types for convenience
pub use audit::{audit_books, AuditReport, Finding, FindingKind};
pub use error::{Error, Result};
pub use facets::{count_facets, facet_values, FacetCounts, FacetValue};
pub use filtering::{filter_books, has_filters, matches_query, matches_selection, parse_facet_selection};
pub use grouping::{
    group_books_by_district, group_books_by_state, state_ban_tallies, DistrictEntry, DistrictKey,
    StateTally,
};
pub use io::{load_books, parse_books};
pub use models::{normalize_state, Ban, Book, FacetGroup, Selection, SortMode, DODEA_LABEL, NATION_STATE};
pub use pagination::{paginate, total_pages, Page, DEFAULT_PAGE_SIZE};
pub use report::{subject_geography_report, StateSubjects, SubjectGeographyReport};
pub use session::{BookOrder, BrowseSession, BrowseView, FacetLists};
pub use sorting::{alphabetical_key, compare_labels, normalize_for_sorting, sort_books_by_title, strip_leading_articles};
pub use store::BookStore;
