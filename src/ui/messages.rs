use colored::Colorize;

/// Semantic level of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
}

/// Print a one-line status message to stderr
pub fn set_status(text: impl AsRef<str>, level: StatusLevel) {
    let text = text.as_ref();
    let line = match level {
        StatusLevel::Info => text.normal(),
        StatusLevel::Success => text.green(),
        StatusLevel::Warning => text.yellow(),
    };
    eprintln!("{}", line);
}

/// Print an error block to stderr
pub fn show_error(title: impl AsRef<str>, message: impl AsRef<str>, details: impl AsRef<str>) {
    eprintln!("{} {}", "error:".red().bold(), title.as_ref().bold());
    eprintln!("{}", message.as_ref());
    let details = details.as_ref();
    if !details.is_empty() {
        eprintln!();
        for line in details.lines() {
            eprintln!("  {}", line.dimmed());
        }
    }
}
