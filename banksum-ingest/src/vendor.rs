//! Vendor tag: maps each supported bank to its directory, file extension,
//! text decoding and parse function.

use std::path::Path;

use banksum_core::{Statement, StatementError, TransactionRecord};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::parsers::{parse_hsbc_text, parse_natwest_text, parse_santander_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Natwest,
    Santander,
    Hsbc,
}

impl Vendor {
    /// Discovery order; also the column order of the balance table.
    pub const ALL: [Vendor; 3] = [Vendor::Natwest, Vendor::Santander, Vendor::Hsbc];

    /// Sub-directory of the statements directory holding this bank's exports.
    pub fn dir_name(self) -> &'static str {
        match self {
            Vendor::Natwest => "natwest",
            Vendor::Santander => "santander",
            Vendor::Hsbc => "hsbc",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Vendor::Natwest | Vendor::Hsbc => "csv",
            Vendor::Santander => "txt",
        }
    }

    /// Parse already-decoded statement text.
    pub fn parse_text(self, source: &str, text: &str) -> Result<Vec<TransactionRecord>, StatementError> {
        match self {
            Vendor::Natwest => parse_natwest_text(source, text),
            Vendor::Santander => parse_santander_text(source, text),
            Vendor::Hsbc => parse_hsbc_text(source, text),
        }
    }

    /// Santander exports are ISO-8859; the CSV exports are UTF-8.
    pub fn decode(self, source: &str, bytes: Vec<u8>) -> Result<String, StatementError> {
        match self {
            Vendor::Santander => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Vendor::Natwest | Vendor::Hsbc => {
                let text = String::from_utf8(bytes)
                    .map_err(|_| StatementError::format(source, None, "file is not valid UTF-8"))?;
                Ok(match text.strip_prefix('\u{feff}') {
                    Some(rest) => rest.to_string(),
                    None => text,
                })
            }
        }
    }

    /// Read and parse one statement file into one statement per account.
    ///
    /// The file name becomes the record source and the balance table column
    /// label; a Natwest file mixing accounts yields `file.csv:Account name`
    /// labels. Running balances are checked for consistency.
    pub fn parse_file(self, path: &Path) -> Result<Vec<Statement>, StatementError> {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = std::fs::read(path).map_err(|e| StatementError::Io {
            file: source.clone(),
            source: e,
        })?;
        let text = self.decode(&source, bytes)?;
        let records = self.parse_text(&source, &text)?;

        debug!("{:?}: parsed {} records from {}", self, records.len(), path.display());
        Statement::from_file(&source, records)
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
