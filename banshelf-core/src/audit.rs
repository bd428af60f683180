use crate::models::Book;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Kind of data-quality problem found on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingId,
    DuplicateId,
    MissingTitle,
    MissingAuthor,
    MissingIsbn,
    MissingOclc,
    NoBans,
    DuplicateSubject,
    BanMissingState,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FindingKind::MissingId => "missing id",
            FindingKind::DuplicateId => "duplicate id",
            FindingKind::MissingTitle => "missing title",
            FindingKind::MissingAuthor => "missing author",
            FindingKind::MissingIsbn => "no ISBN",
            FindingKind::MissingOclc => "no OCLC number",
            FindingKind::NoBans => "no ban events",
            FindingKind::DuplicateSubject => "repeated subject",
            FindingKind::BanMissingState => "ban without state",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Position in the loaded dataset
    pub index: usize,
    pub book_id: String,
    pub title: String,
    pub kind: FindingKind,
    pub detail: Option<String>,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book #{} ('{}'): {}", self.index + 1, self.title, self.kind)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub books_checked: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings per kind
    pub fn summary(&self) -> Vec<(FindingKind, usize)> {
        let mut counts: HashMap<FindingKind, usize> = HashMap::new();
        for finding in &self.findings {
            *counts.entry(finding.kind).or_default() += 1;
        }
        let mut summary: Vec<_> = counts.into_iter().collect();
        summary.sort();
        summary
    }
}

/// Inspect every record for gaps left by the enrichment pipeline
/// Nothing here blocks loading; the dataset is used as-is
pub fn audit_books(books: &[Book]) -> AuditReport {
    let mut findings = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, book) in books.iter().enumerate() {
        let mut push = |kind: FindingKind, detail: Option<String>| {
            findings.push(Finding {
                index,
                book_id: book.id.clone(),
                title: book.display_title().to_string(),
                kind,
                detail,
            });
        };

        if book.id.is_empty() {
            push(FindingKind::MissingId, None);
        } else if !seen_ids.insert(book.id.as_str()) {
            push(FindingKind::DuplicateId, Some(book.id.clone()));
        }

        if book.title.is_none() {
            push(FindingKind::MissingTitle, None);
        }
        if book.author.is_none() {
            push(FindingKind::MissingAuthor, None);
        }
        if book.isbn.is_none() {
            push(FindingKind::MissingIsbn, None);
        }
        if book.oclc.is_none() {
            push(FindingKind::MissingOclc, None);
        }
        if book.bans.is_empty() {
            push(FindingKind::NoBans, None);
        }

        let mut subjects = HashSet::new();
        for subject in &book.subjects {
            if !subjects.insert(subject.as_str()) {
                push(FindingKind::DuplicateSubject, Some(subject.clone()));
            }
        }

        for ban in &book.bans {
            if ban.state.is_empty() {
                push(FindingKind::BanMissingState, Some(ban.district.clone()));
            }
        }
    }

    AuditReport {
        books_checked: books.len(),
        findings,
    }
}
