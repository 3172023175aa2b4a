use anyhow::{Context, Result, bail};
use banksum_finance::{BalanceOptions, CategoryRule, HsbcBalance};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "banksum.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub statements: StatementsSection,
    pub balances: BalancesSection,
    /// Keyword rules for the weekly report, first match wins.
    pub categories: Vec<CategoryRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementsSection {
    /// Directory holding `natwest/`, `santander/` and `hsbc/`.
    pub dir: PathBuf,
}

impl Default for StatementsSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("statements"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancesSection {
    pub hsbc: HsbcBalance,
    pub fill_calendar_days: bool,
    pub from_common_start: bool,
}

impl BalancesSection {
    pub fn options(&self) -> BalanceOptions {
        BalanceOptions {
            hsbc_balance: self.hsbc,
            fill_calendar_days: self.fill_calendar_days,
            from_common_start: self.from_common_start,
        }
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config")
}

/// An explicit path must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) if !p.exists() => bail!("config file not found: {}", p.display()),
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("in {}", p.display()))
}
