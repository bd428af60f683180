use banshelf_core::{
    AuditReport, Book, BrowseView, DistrictEntry, DistrictKey, FacetGroup, FacetValue, Selection,
    StateTally, SubjectGeographyReport,
};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Heading used for a facet group
pub fn facet_heading(group: FacetGroup) -> &'static str {
    match group {
        FacetGroup::Subject => "Subjects",
        FacetGroup::State => "States",
        FacetGroup::District => "Districts",
    }
}

/// Format one result line: position, title, author, ban count
pub fn format_book_line(position: usize, book: &Book) -> String {
    let mut line = format!("{}. {}", position, book.display_title().bold());
    if let Some(author) = &book.author {
        let _ = write!(line, " by {}", author);
    }
    let bans = book.ban_count();
    let _ = write!(
        line,
        " ({} {})",
        bans,
        if bans == 1 { "ban" } else { "bans" }
    );
    line
}

/// Format the secondary details shown under a result line
pub fn format_book_details(book: &Book) -> String {
    let mut details = Vec::new();

    let subjects = book.distinct_subjects();
    if !subjects.is_empty() {
        details.push(format!("Subjects: {}", subjects.join(", ")));
    }

    let states: Vec<&str> = book.distinct_states().into_iter().collect();
    if !states.is_empty() {
        details.push(format!("States: {}", states.join(", ")));
    }

    let identifiers: Vec<String> = [("ISBN", &book.isbn), ("OCLC", &book.oclc), ("LCCN", &book.lccn)]
        .iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| format!("{} {}", label, v)))
        .collect();
    if !identifiers.is_empty() {
        details.push(identifiers.join(" · "));
    }

    if let Some(level) = &book.popularity_level {
        details.push(format!("Popularity: {}", level));
    }

    details
        .into_iter()
        .map(|line| format!("   {}", line.dimmed()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the active filters block, or None when nothing is selected
pub fn format_selection(selection: &Selection) -> Option<String> {
    let mut lines = Vec::new();

    if !selection.query.trim().is_empty() {
        lines.push(format!("- **Search:** \"{}\"", selection.query.trim()));
    }

    for group in FacetGroup::ALL {
        let values = selection.values(group);
        if !values.is_empty() {
            let joined = values.iter().map(String::as_str).collect::<Vec<_>>().join(" AND ");
            lines.push(format!("- **{}:** {}", facet_heading(group), joined));
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Format a facet list, marking selected values, truncated to `limit`
pub fn format_facet_list(
    group: FacetGroup,
    values: &[FacetValue],
    selection: &Selection,
    limit: usize,
) -> String {
    let mut out = format!("### {} ({})\n", facet_heading(group), values.len());

    for value in values.iter().take(limit) {
        let marker = if selection.values(group).contains(&value.value) {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        let _ = writeln!(out, "- {} {} ({})", marker, value.value, value.count);
    }

    if values.len() > limit {
        let _ = writeln!(out, "- _... {} more_", values.len() - limit);
    }

    out
}

/// Format a whole browse view: filters, result page, and facets
pub fn format_browse_view(view: &BrowseView<'_>, selection: &Selection, facet_limit: usize) -> String {
    let mut out = String::from("# Banned Books\n\n");

    if let Some(filters) = format_selection(selection) {
        let _ = writeln!(out, "## Active Filters\n\n{}\n", filters);
    }

    let _ = writeln!(out, "**Matching Books:** {}\n", view.total_items());

    if view.total_items() == 0 {
        out.push_str("_No books match the specified filters._\n\n");
    } else {
        let _ = writeln!(out, "## Page {} of {}\n", view.page, view.total_pages);
        let offset = (view.page - 1) * view.page_size;
        for (i, book) in view.page_items().iter().enumerate() {
            let _ = writeln!(out, "{}", format_book_line(offset + i + 1, book));
            let details = format_book_details(book);
            if !details.is_empty() {
                let _ = writeln!(out, "{}", details);
            }
        }
        out.push('\n');

        let mut nav = Vec::new();
        if view.has_previous() {
            nav.push(format!("--page {} for previous", view.page - 1));
        }
        if view.has_next() {
            nav.push(format!("--page {} for next", view.page + 1));
        }
        if !nav.is_empty() {
            let _ = writeln!(out, "_{}_\n", nav.join(", "));
        }
    }

    out.push_str("## Facets\n\n");
    for group in FacetGroup::ALL {
        out.push_str(&format_facet_list(group, view.facets.get(group), selection, facet_limit));
        out.push('\n');
    }

    out
}

/// Format per-state tallies as a table
pub fn format_state_tallies(tallies: &[StateTally]) -> String {
    let width = tallies
        .iter()
        .map(|t| t.state.len())
        .max()
        .unwrap_or(5)
        .max("State".len());

    let mut out = String::from("# Bans by State\n\n");
    let _ = writeln!(out, "{:<width$}  {:>6}  {:>6}  {:>9}", "State", "Books", "Bans", "Districts");
    for tally in tallies {
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>6}  {:>9}",
            tally.state, tally.books, tally.bans, tally.districts
        );
    }
    out
}

/// Format books listed under each district
pub fn format_district_groups(groups: &BTreeMap<DistrictKey, Vec<DistrictEntry<'_>>>) -> String {
    let mut out = String::from("# Bans by District\n\n");

    for (key, entries) in groups {
        let _ = writeln!(out, "## {} - {} ({})\n", key.state, key.district, entries.len());
        for entry in entries {
            let mut line = format!("- {}", entry.book.display_title());
            if let Some(author) = &entry.book.author {
                let _ = write!(line, " by {}", author);
            }
            let extra: Vec<&str> = [entry.date, entry.ban_status].into_iter().flatten().collect();
            if !extra.is_empty() {
                let _ = write!(line, " [{}]", extra.join(", "));
            }
            let _ = writeln!(out, "{}", line);
        }
        out.push('\n');
    }

    out
}

/// Format the subject-by-geography report
pub fn format_report(report: &SubjectGeographyReport) -> String {
    let mut out = String::from("# Subjects by State\n\n");
    let _ = writeln!(out, "**Books:** {}\n", report.total_books);

    out.push_str("## All States\n\n");
    for value in &report.top_subjects {
        let _ = writeln!(out, "- {} ({})", value.value, value.count);
    }
    out.push('\n');

    for state in &report.states {
        let _ = writeln!(out, "## {} ({} books)\n", state.state, state.books);
        for value in &state.top_subjects {
            let _ = writeln!(out, "- {} ({})", value.value, value.count);
        }
        out.push('\n');
    }

    out
}

/// Format a data audit
pub fn format_audit(report: &AuditReport) -> String {
    let mut out = String::from("# Data Audit\n\n");
    let _ = writeln!(out, "**Books checked:** {}\n", report.books_checked);

    if report.is_clean() {
        out.push_str("_No problems found._\n");
        return out;
    }

    out.push_str("## Summary\n\n");
    for (kind, count) in report.summary() {
        let _ = writeln!(out, "- {}: {}", kind, count);
    }

    out.push_str("\n## Findings\n\n");
    for (i, finding) in report.findings.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, finding);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use banshelf_core::{audit_books, state_ban_tallies, Ban, BookStore, BrowseSession};
    use std::sync::Arc;

    fn plain() {
        colored::control::set_override(false);
    }

    fn book(id: &str, title: &str, state: &str) -> Book {
        Book {
            id: id.to_string(),
            title: Some(title.to_string()),
            author: Some("Toni Morrison".to_string()),
            subjects: vec!["Race".to_string(), "Race".to_string()],
            bans: vec![Ban {
                state: state.to_string(),
                district: "Central".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_book_line() {
        plain();
        let line = format_book_line(3, &book("1", "Beloved", "Texas"));
        assert_eq!(line, "3. Beloved by Toni Morrison (1 ban)");
    }

    #[test]
    fn test_book_details_dedupes_and_normalizes() {
        plain();
        let details = format_book_details(&book("1", "Beloved", "Nation"));
        assert!(details.contains("Subjects: Race\n") || details.ends_with("Subjects: Race"));
        assert!(details.contains("States: DoDEA"));
    }

    #[test]
    fn test_selection_block() {
        let mut selection = Selection::new();
        assert!(format_selection(&selection).is_none());

        selection.select(FacetGroup::Subject, "Race");
        selection.select(FacetGroup::Subject, "Identity");
        let block = format_selection(&selection).unwrap();
        assert_eq!(block, "- **Subjects:** Identity AND Race");
    }

    #[test]
    fn test_facet_list_truncates() {
        plain();
        let values = vec![
            FacetValue { value: "Texas".to_string(), count: 4 },
            FacetValue { value: "Florida".to_string(), count: 2 },
        ];
        let mut selection = Selection::new();
        selection.select(FacetGroup::State, "Texas");

        let out = format_facet_list(FacetGroup::State, &values, &selection, 1);
        assert!(out.contains("- [x] Texas (4)"));
        assert!(!out.contains("Florida"));
        assert!(out.contains("1 more"));
    }

    #[test]
    fn test_browse_view_rendering() {
        plain();
        let store = Arc::new(BookStore::new(vec![
            book("1", "Beloved", "Texas"),
            book("2", "The Bluest Eye", "Nation"),
        ]));
        let mut session = BrowseSession::new(store, 1).unwrap();
        session.toggle_state("DoDEA");
        let view = session.view().unwrap();

        let out = format_browse_view(&view, session.selection(), 10);
        assert!(out.contains("**Matching Books:** 1"));
        assert!(out.contains("1. The Bluest Eye"));
        assert!(!out.contains("Beloved"));
        assert!(out.contains("- [x] DoDEA (1)"));
    }

    #[test]
    fn test_state_table() {
        let books = vec![book("1", "Beloved", "Texas")];
        let out = format_state_tallies(&state_ban_tallies(&books));
        assert!(out.contains("Texas"));
        assert!(out.lines().count() >= 4);
    }

    #[test]
    fn test_audit_clean_and_dirty() {
        let clean = AuditReport::default();
        assert!(format_audit(&clean).contains("No problems found"));

        let dirty = audit_books(&[book("1", "Beloved", "Texas")]);
        let out = format_audit(&dirty);
        assert!(out.contains("no ISBN: 1"));
        assert!(out.contains("repeated subject: 1"));
    }
}
