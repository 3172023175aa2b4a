//! Error kinds for statement parsing.
//!
//! Every variant that originates in a file carries that file's name so the
//! binary can report which statement broke the run.

use std::path::PathBuf;

/// Failure to normalize a single raw field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("invalid date '{raw}' (expected {expected})")]
    Date { raw: String, expected: &'static str },
    #[error("invalid amount '{raw}'")]
    Amount { raw: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    /// No statement files were found under any vendor directory.
    #[error("no statement files found under {}", .dir.display())]
    MissingFiles { dir: PathBuf },

    /// The file does not have the shape of the vendor's export.
    #[error("{file}{}: {reason}", at_line(.line))]
    Format {
        file: String,
        line: Option<usize>,
        reason: String,
    },

    #[error("{file}:{line}: invalid date '{raw}' (expected {expected})")]
    DateFormat {
        file: String,
        line: usize,
        raw: String,
        expected: &'static str,
    },

    #[error("{file}:{line}: invalid amount '{raw}'")]
    AmountFormat {
        file: String,
        line: usize,
        raw: String,
    },

    #[error("reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|n| format!(":{n}")).unwrap_or_default()
}

impl StatementError {
    pub fn format(file: impl Into<String>, line: Option<usize>, reason: impl Into<String>) -> Self {
        StatementError::Format {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Attach file/line context to a field-level normalizer failure.
    pub fn at(file: &str, line: usize, err: NormalizeError) -> Self {
        match err {
            NormalizeError::Date { raw, expected } => StatementError::DateFormat {
                file: file.to_string(),
                line,
                raw,
                expected,
            },
            NormalizeError::Amount { raw } => StatementError::AmountFormat {
                file: file.to_string(),
                line,
                raw,
            },
        }
    }

    /// Name of the file the error refers to, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            StatementError::MissingFiles { .. } => None,
            StatementError::Format { file, .. }
            | StatementError::DateFormat { file, .. }
            | StatementError::AmountFormat { file, .. }
            | StatementError::Io { file, .. } => Some(file),
        }
    }
}
