use banshelf_core::{load_books, BookStore};
use std::sync::Arc;
use tracing::info;

use super::config::Config;

/// Loaded dataset plus the resolved configuration
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Shared with every consumer; never mutated after load
    pub store: Arc<BookStore>,
}

impl AppState {
    /// One-shot load of the dataset named by the config
    pub fn load(config: Config) -> banshelf_core::Result<Self> {
        let store = load_books(&config.data_path)?;
        info!(
            books = store.len(),
            path = %config.data_path.display(),
            "dataset loaded"
        );

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    #[cfg(test)]
    pub fn from_store(config: Config, store: BookStore) -> Self {
        Self {
            config,
            store: Arc::new(store),
        }
    }
}
