pub mod formatting;
pub mod messages;
pub mod output;

pub use formatting::{
    format_audit, format_browse_view, format_district_groups, format_report, format_state_tallies,
};
pub use messages::{set_status, show_error, StatusLevel};
pub use output::{print_json, OutputFormat};
