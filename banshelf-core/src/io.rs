use crate::error::Result;
use crate::models::Book;
use crate::store::BookStore;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load the book dataset from a JSON file
pub fn load_books<P: AsRef<Path>>(path: P) -> Result<BookStore> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading book dataset");
    let contents = fs::read_to_string(path)?;
    parse_books(&contents)
}

/// Parse a JSON array of book records
/// Entries that are not objects are skipped; missing fields fall back to defaults
pub fn parse_books(json: &str) -> Result<BookStore> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    let total = records.len();

    let books: Vec<Book> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if !record.is_object() {
                warn!(index, "skipping non-object book record");
                return None;
            }
            match serde_json::from_value(record) {
                Ok(book) => Some(book),
                Err(err) => {
                    warn!(index, error = %err, "skipping unreadable book record");
                    None
                }
            }
        })
        .collect();

    debug!(loaded = books.len(), skipped = total - books.len(), "book dataset parsed");
    Ok(BookStore::new(books))
}
