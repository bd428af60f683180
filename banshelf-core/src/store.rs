use crate::models::Book;
use std::collections::HashMap;

/// The authoritative in-memory set of loaded books
/// Shared read-only by handle (`Arc<BookStore>`) between consumers
#[derive(Debug, Default)]
pub struct BookStore {
    books: Vec<Book>,
    by_id: HashMap<String, usize>,
}

impl BookStore {
    pub fn new(books: Vec<Book>) -> Self {
        let mut by_id = HashMap::with_capacity(books.len());
        for (index, book) in books.iter().enumerate() {
            // First record wins for duplicate ids
            by_id.entry(book.id.clone()).or_insert(index);
        }
        Self { books, by_id }
    }

    /// Books in load order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.by_id.get(id).map(|&index| &self.books[index])
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
