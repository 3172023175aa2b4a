pub mod hsbc;
pub mod natwest;
pub mod santander;

pub use hsbc::parse_hsbc_text;
pub use natwest::parse_natwest_text;
pub use santander::parse_santander_text;

/// 1-based line number of a csv record, for error messages.
pub(crate) fn csv_line(record: &csv::StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

pub(crate) fn csv_error(source: &str, err: csv::Error) -> banksum_core::StatementError {
    let line = err.position().map(|p| p.line() as usize);
    banksum_core::StatementError::format(source, line, err.to_string())
}

pub(crate) fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}
