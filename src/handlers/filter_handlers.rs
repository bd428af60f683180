use anyhow::{Context, Result};
use banshelf_core::{parse_facet_selection, BookOrder, BrowseSession, FacetGroup, SortMode};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;
use crate::ui::{format_browse_view, print_json, set_status, OutputFormat, StatusLevel};

/// Options for the `browse` command, already merged with config
#[derive(Debug, Clone)]
pub struct BrowseOptions {
    /// "group=value" strings
    pub facets: Vec<String>,
    pub query: Option<String>,
    pub page: usize,
    pub page_size: usize,
    pub order: BookOrder,
    pub subject_sort: SortMode,
    pub state_sort: SortMode,
    pub district_sort: SortMode,
    pub facet_limit: usize,
}

#[derive(Serialize)]
struct BrowseOutput<'a> {
    page: usize,
    page_size: usize,
    total_pages: usize,
    total_items: usize,
    selection: &'a banshelf_core::Selection,
    books: &'a [&'a banshelf_core::Book],
    facets: banshelf_core::FacetLists,
}

/// Build a browse session from the options
pub fn build_session(state: &AppState, options: &BrowseOptions) -> Result<BrowseSession> {
    let mut session = BrowseSession::new(state.store.clone(), options.page_size)?;

    let mut selection = parse_facet_selection(&options.facets)?;
    if let Some(query) = &options.query {
        selection.query = query.clone();
    }
    session.set_selection(selection);
    session.set_order(options.order);
    session.set_sort(FacetGroup::Subject, options.subject_sort);
    session.set_sort(FacetGroup::State, options.state_sort);
    session.set_sort(FacetGroup::District, options.district_sort);

    session
        .go_to_page(options.page)
        .with_context(|| format!("Cannot show page {}", options.page))?;

    debug!(page = session.page(), "browse session ready");
    Ok(session)
}

/// Run the `browse` command
pub fn handle_browse(state: &AppState, options: &BrowseOptions, format: OutputFormat) -> Result<()> {
    let session = build_session(state, options)?;
    let view = session.view()?;

    match format {
        OutputFormat::Json => {
            let mut facets = view.facets.clone();
            facets.subjects.truncate(options.facet_limit);
            facets.states.truncate(options.facet_limit);
            facets.districts.truncate(options.facet_limit);

            print_json(&BrowseOutput {
                page: view.page,
                page_size: view.page_size,
                total_pages: view.total_pages,
                total_items: view.total_items(),
                selection: session.selection(),
                books: view.page_items(),
                facets,
            })?;
        }
        OutputFormat::Text => {
            print!("{}", format_browse_view(&view, session.selection(), options.facet_limit));
            if session.has_filters() {
                set_status(
                    format!("Filters applied: {} books match", view.total_items()),
                    StatusLevel::Info,
                );
            }
        }
    }

    Ok(())
}
