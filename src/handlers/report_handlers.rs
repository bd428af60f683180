use anyhow::Result;
use banshelf_core::{audit_books, subject_geography_report};
use tracing::warn;

use crate::state::AppState;
use crate::ui::{format_audit, format_report, print_json, set_status, OutputFormat, StatusLevel};

/// Run the `report` command
pub fn handle_report(state: &AppState, top: usize, format: OutputFormat) -> Result<()> {
    let report = subject_geography_report(state.store.books(), top);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print!("{}", format_report(&report)),
    }
    Ok(())
}

/// Run the `audit` command
pub fn handle_audit(state: &AppState, format: OutputFormat) -> Result<()> {
    let report = audit_books(state.store.books());
    if !report.is_clean() {
        warn!(findings = report.findings.len(), "dataset has data-quality findings");
    }

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            print!("{}", format_audit(&report));
            if report.is_clean() {
                set_status("Dataset is clean", StatusLevel::Success);
            } else {
                set_status(
                    format!("{} findings in {} books", report.findings.len(), report.books_checked),
                    StatusLevel::Warning,
                );
            }
        }
    }
    Ok(())
}
