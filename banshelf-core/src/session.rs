use crate::error::{Error, Result};
use crate::facets::{count_facets, FacetCounts, FacetValue};
use crate::filtering::{filter_books, has_filters};
use crate::models::{Book, FacetGroup, Selection, SortMode};
use crate::pagination::{paginate, total_pages};
use crate::sorting::sort_books_by_title;
use crate::store::BookStore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// Ordering of the result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookOrder {
    /// Most bans first, input order for ties
    #[default]
    BanCount,
    /// Title collation, ban-count order for ties
    Title,
}

/// Browser state: selection, page number, and facet sort modes
///
/// The store is shared by handle. Nothing is recomputed implicitly; call
/// [`BrowseSession::view`] after mutating the session.
#[derive(Debug)]
pub struct BrowseSession {
    store: Arc<BookStore>,
    selection: Selection,
    page: usize,
    page_size: usize,
    order: BookOrder,
    sort_modes: BTreeMap<FacetGroup, SortMode>,
}

/// Facet value lists for every group, sorted per the session's modes
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetLists {
    pub subjects: Vec<FacetValue>,
    pub states: Vec<FacetValue>,
    pub districts: Vec<FacetValue>,
}

impl FacetLists {
    pub fn get(&self, group: FacetGroup) -> &[FacetValue] {
        match group {
            FacetGroup::Subject => &self.subjects,
            FacetGroup::State => &self.states,
            FacetGroup::District => &self.districts,
        }
    }
}

/// Result of recomputing a session
#[derive(Debug)]
pub struct BrowseView<'a> {
    /// Every matching book, in result order
    pub books: Vec<&'a Book>,
    pub counts: FacetCounts,
    pub facets: FacetLists,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    page_range: Range<usize>,
}

impl<'a> BrowseView<'a> {
    /// Books on the current page
    pub fn page_items(&self) -> &[&'a Book] {
        &self.books[self.page_range.clone()]
    }

    pub fn total_items(&self) -> usize {
        self.books.len()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl BrowseSession {
    pub fn new(store: Arc<BookStore>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidInput("page size must be at least 1".to_string()));
        }

        Ok(Self {
            store,
            selection: Selection::new(),
            page: 1,
            page_size,
            order: BookOrder::default(),
            sort_modes: FacetGroup::ALL
                .iter()
                .map(|group| (*group, SortMode::default()))
                .collect(),
        })
    }

    pub fn store(&self) -> &Arc<BookStore> {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn order(&self) -> BookOrder {
        self.order
    }

    pub fn has_filters(&self) -> bool {
        has_filters(&self.selection)
    }

    /// Replace the whole selection (e.g. from command-line flags)
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.reset_page();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.selection.query = query.into();
        self.reset_page();
    }

    pub fn toggle(&mut self, group: FacetGroup, value: &str) {
        self.selection.toggle(group, value);
        self.reset_page();
    }

    pub fn remove(&mut self, group: FacetGroup, value: &str) {
        if self.selection.remove(group, value) {
            self.reset_page();
        }
    }

    pub fn toggle_subject(&mut self, subject: &str) {
        self.toggle(FacetGroup::Subject, subject);
    }

    pub fn toggle_state(&mut self, state: &str) {
        self.toggle(FacetGroup::State, state);
    }

    pub fn toggle_district(&mut self, district: &str) {
        self.toggle(FacetGroup::District, district);
    }

    pub fn remove_subject(&mut self, subject: &str) {
        self.remove(FacetGroup::Subject, subject);
    }

    pub fn remove_state(&mut self, state: &str) {
        self.remove(FacetGroup::State, state);
    }

    pub fn remove_district(&mut self, district: &str) {
        self.remove(FacetGroup::District, district);
    }

    /// Drop every facet selection and the query
    pub fn clear_filters(&mut self) {
        self.selection.clear();
        self.reset_page();
    }

    pub fn set_order(&mut self, order: BookOrder) {
        if self.order != order {
            self.order = order;
            self.reset_page();
        }
    }

    pub fn sort_mode(&self, group: FacetGroup) -> SortMode {
        self.sort_modes.get(&group).copied().unwrap_or_default()
    }

    pub fn set_sort(&mut self, group: FacetGroup, mode: SortMode) {
        self.sort_modes.insert(group, mode);
    }

    /// Flip a facet group between count and alphabetical order
    pub fn toggle_sort(&mut self, group: FacetGroup) {
        let mode = self.sort_mode(group).toggled();
        self.set_sort(group, mode);
    }

    /// Total pages for the current selection
    pub fn total_pages(&self) -> usize {
        let matched = filter_books(self.store.books(), &self.selection).len();
        total_pages(matched, self.page_size)
    }

    /// Advance one page; does nothing on the last page
    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; does nothing on the first page
    pub fn previous_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a 1-based page, rejecting pages outside the result
    pub fn go_to_page(&mut self, page: usize) -> Result<()> {
        let total_pages = self.total_pages();
        if page == 0 || (page > total_pages && page != 1) {
            return Err(Error::PageOutOfRange { page, total_pages });
        }
        self.page = page;
        Ok(())
    }

    /// Recompute the filtered result, facet lists, and current page
    pub fn view(&self) -> Result<BrowseView<'_>> {
        let mut books = filter_books(self.store.books(), &self.selection);
        if self.order == BookOrder::Title {
            sort_books_by_title(&mut books);
        }

        let counts = count_facets(books.iter().copied());
        let facets = FacetLists {
            subjects: counts.values(FacetGroup::Subject, self.sort_mode(FacetGroup::Subject)),
            states: counts.values(FacetGroup::State, self.sort_mode(FacetGroup::State)),
            districts: counts.values(FacetGroup::District, self.sort_mode(FacetGroup::District)),
        };

        let (page_range, total_pages) = {
            let page = paginate(&books, self.page_size, self.page)?;
            let start = (page.page - 1) * self.page_size;
            (start..start + page.items.len(), page.total_pages)
        };

        debug!(
            matched = books.len(),
            page = self.page,
            total_pages,
            "recomputed browse view"
        );

        Ok(BrowseView {
            books,
            counts,
            facets,
            page: self.page,
            page_size: self.page_size,
            total_pages,
            page_range,
        })
    }

    fn reset_page(&mut self) {
        self.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ban;

    fn store_of(count: usize) -> Arc<BookStore> {
        let books = (0..count)
            .map(|i| Book {
                id: i.to_string(),
                title: Some(format!("Book {:03}", i)),
                subjects: if i % 2 == 0 {
                    vec!["Fiction".to_string()]
                } else {
                    vec!["History".to_string()]
                },
                bans: vec![Ban {
                    state: (if i % 5 == 0 { "Nation" } else { "Texas" }).to_string(),
                    district: format!("District {}", i % 3),
                    ..Default::default()
                }],
                ..Default::default()
            })
            .collect();
        Arc::new(BookStore::new(books))
    }

    #[test]
    fn test_pages_of_250() {
        let mut session = BrowseSession::new(store_of(250), 100).unwrap();
        assert_eq!(session.total_pages(), 3);

        assert!(session.next_page());
        assert!(session.next_page());
        assert!(!session.next_page());
        assert_eq!(session.page(), 3);

        let view = session.view().unwrap();
        assert_eq!(view.page_items().len(), 50);
        assert!(!view.has_next());
        assert!(view.has_previous());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = BrowseSession::new(store_of(250), 100).unwrap();
        session.go_to_page(3).unwrap();

        session.toggle_subject("Fiction");
        assert_eq!(session.page(), 1);

        session.go_to_page(2).unwrap();
        session.set_query("book");
        assert_eq!(session.page(), 1);

        session.go_to_page(2).unwrap();
        session.clear_filters();
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_go_to_page_rejects_out_of_range() {
        let mut session = BrowseSession::new(store_of(250), 100).unwrap();
        assert!(matches!(
            session.go_to_page(4),
            Err(Error::PageOutOfRange { page: 4, total_pages: 3 })
        ));
        assert!(session.go_to_page(0).is_err());
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_previous_page_stops_at_first() {
        let mut session = BrowseSession::new(store_of(10), 5).unwrap();
        assert!(!session.previous_page());
        assert!(session.next_page());
        assert!(session.previous_page());
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_view_counts_reflect_filtered_set() {
        let mut session = BrowseSession::new(store_of(10), 100).unwrap();
        session.toggle_subject("Fiction");

        let view = session.view().unwrap();
        assert_eq!(view.total_items(), 5);
        assert_eq!(view.counts.count(FacetGroup::Subject, "Fiction"), 5);
        assert_eq!(view.counts.count(FacetGroup::Subject, "History"), 0);
        // ids 0, 2, 4, 6, 8; 0 is a Nation ban
        assert_eq!(view.counts.count(FacetGroup::State, "DoDEA"), 1);
        assert_eq!(view.counts.count(FacetGroup::State, "Texas"), 4);
        assert!(view.facets.subjects.iter().all(|v| v.value != "History"));
    }

    #[test]
    fn test_toggle_sort_changes_facet_order() {
        let mut session = BrowseSession::new(store_of(10), 100).unwrap();

        let by_count = session.view().unwrap();
        assert_eq!(by_count.facets.states[0].value, "Texas");
        drop(by_count);

        session.toggle_sort(FacetGroup::State);
        assert_eq!(session.sort_mode(FacetGroup::State), SortMode::Alpha);
        let by_alpha = session.view().unwrap();
        assert_eq!(by_alpha.facets.states[0].value, "DoDEA");
    }

    #[test]
    fn test_empty_result_views_first_page() {
        let mut session = BrowseSession::new(store_of(10), 100).unwrap();
        session.toggle_subject("Poetry");

        let view = session.view().unwrap();
        assert_eq!(view.total_pages, 0);
        assert!(view.page_items().is_empty());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(BrowseSession::new(store_of(1), 0).is_err());
    }

    #[test]
    fn test_title_order() {
        let mut session = BrowseSession::new(store_of(3), 100).unwrap();
        session.set_order(BookOrder::Title);
        let view = session.view().unwrap();
        let titles: Vec<&str> = view.page_items().iter().map(|b| b.display_title()).collect();
        assert_eq!(titles, vec!["Book 000", "Book 001", "Book 002"]);
    }
}
