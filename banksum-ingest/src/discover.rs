//! Statement discovery: `<dir>/natwest/*.csv`, `<dir>/santander/*.txt`,
//! `<dir>/hsbc/*.csv`.

use std::path::{Path, PathBuf};

use banksum_core::{Statement, StatementError};
use log::{info, warn};

use crate::vendor::Vendor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFile {
    pub vendor: Vendor,
    pub path: PathBuf,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// List statement files per vendor, sorted by file name within each vendor.
///
/// An absent or empty vendor directory is fine (no accounts at that bank);
/// finding nothing at all is [`StatementError::MissingFiles`].
pub fn discover(dir: &Path) -> Result<Vec<StatementFile>, StatementError> {
    let mut files = Vec::new();

    for vendor in Vendor::ALL {
        let vendor_dir = dir.join(vendor.dir_name());
        if !vendor_dir.is_dir() {
            warn!("no {} directory at {}", vendor, vendor_dir.display());
            continue;
        }

        let entries = std::fs::read_dir(&vendor_dir).map_err(|e| StatementError::Io {
            file: vendor_dir.display().to_string(),
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StatementError::Io {
                file: vendor_dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, vendor.extension()) {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            warn!("no *.{} files in {}", vendor.extension(), vendor_dir.display());
        }
        files.extend(paths.into_iter().map(|path| StatementFile { vendor, path }));
    }

    if files.is_empty() {
        return Err(StatementError::MissingFiles {
            dir: dir.to_path_buf(),
        });
    }

    info!("found {} statement files under {}", files.len(), dir.display());
    Ok(files)
}

/// Parse every discovered file in order, flattening multi-account files.
/// The first failure aborts the run.
pub fn load_all(files: &[StatementFile]) -> Result<Vec<Statement>, StatementError> {
    let mut statements = Vec::new();
    for file in files {
        statements.extend(file.vendor.parse_file(&file.path)?);
    }
    Ok(statements)
}
