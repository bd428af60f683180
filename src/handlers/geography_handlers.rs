use anyhow::Result;
use banshelf_core::{group_books_by_district, normalize_state, state_ban_tallies};
use std::collections::BTreeMap;

use crate::state::AppState;
use crate::ui::{format_district_groups, format_state_tallies, print_json, OutputFormat};

/// Run the `map` command: per-state tallies for the choropleth
pub fn handle_map(state: &AppState, format: OutputFormat) -> Result<()> {
    let tallies = state_ban_tallies(state.store.books());

    match format {
        OutputFormat::Json => print_json(&tallies)?,
        OutputFormat::Text => print!("{}", format_state_tallies(&tallies)),
    }
    Ok(())
}

/// Run the `districts` command, optionally limited to one state
/// The state filter accepts the raw "Nation" or the "DoDEA" label
pub fn handle_districts(state: &AppState, only_state: Option<&str>, format: OutputFormat) -> Result<()> {
    let mut groups = group_books_by_district(state.store.books());

    if let Some(wanted) = only_state {
        let wanted = normalize_state(wanted.trim());
        groups.retain(|key, _| key.state == wanted);
    }

    match format {
        OutputFormat::Json => {
            let flat: BTreeMap<String, _> = groups
                .iter()
                .map(|(key, entries)| (format!("{} - {}", key.state, key.district), entries))
                .collect();
            print_json(&flat)?;
        }
        OutputFormat::Text => print!("{}", format_district_groups(&groups)),
    }
    Ok(())
}
