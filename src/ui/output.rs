use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable markdown-ish text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Write a value to stdout as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
