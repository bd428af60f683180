pub mod filter_handlers;
pub mod geography_handlers;
pub mod report_handlers;

pub use filter_handlers::{handle_browse, BrowseOptions};
pub use geography_handlers::{handle_districts, handle_map};
pub use report_handlers::{handle_audit, handle_report};
