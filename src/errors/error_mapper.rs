use banshelf_core::Error;
use std::io::ErrorKind;
use std::path::Path;

/// Map dataset loading errors to user-friendly messages
/// Returns (title, message, details)
pub fn map_load_error(error: &Error, path: &Path) -> (String, String, String) {
    match error {
        Error::Io(io) if io.kind() == ErrorKind::NotFound => (
            "File Not Found".to_string(),
            "The book dataset could not be found.".to_string(),
            format!(
                "Path: {}\n\nPass --data or set BANSHELF_DATA to the location of data.json.",
                path.display()
            ),
        ),
        Error::Io(io) if io.kind() == ErrorKind::PermissionDenied => (
            "Permission Denied".to_string(),
            "Permission denied.".to_string(),
            format!("You don't have permission to read this file:\n{}", path.display()),
        ),
        Error::Json(json) => (
            "Invalid Dataset".to_string(),
            "The dataset is not a JSON array of book records.".to_string(),
            format!("{}\n\nFile: {}", json, path.display()),
        ),
        other => (
            "Error Loading Data".to_string(),
            "Failed to load the book dataset.".to_string(),
            other.to_string(),
        ),
    }
}
