//! Date and money normalization shared by the vendor parsers.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Day-before-month layouts used by the supported banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    /// `25/12/2017`
    DayMonthYearSlash,
    /// `25-12-2017`, also the output format
    DayMonthYearDash,
    /// `25 Dec 2017`
    DayShortMonthYear,
}

impl DateFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
            DateFormat::DayMonthYearDash => "%d-%m-%Y",
            DateFormat::DayShortMonthYear => "%d %b %Y",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
            DateFormat::DayMonthYearDash => "DD-MM-YYYY",
            DateFormat::DayShortMonthYear => "DD Mon YYYY",
        }
    }
}

/// Parse a vendor date. Fields must be zero padded: chrono alone would accept
/// `1/3/2024`, which does not round-trip.
pub fn parse_date(raw: &str, format: DateFormat) -> Result<NaiveDate, NormalizeError> {
    let trimmed = raw.trim();
    let err = || NormalizeError::Date {
        raw: raw.to_string(),
        expected: format.describe(),
    };

    let date = NaiveDate::parse_from_str(trimmed, format.pattern()).map_err(|_| err())?;
    if !format_date(date, format).eq_ignore_ascii_case(trimmed) {
        return Err(err());
    }
    Ok(date)
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}

const CURRENCY_SYMBOLS: &[char] = &['£', '$', '€'];

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|\d{1,3}(?:,\d{3})+)(?:\.\d+)?$").expect("amount pattern compiles")
});

fn split_sign(s: &str) -> (Option<bool>, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (Some(true), rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (Some(false), rest)
    } else {
        (None, s)
    }
}

/// Parse currency text such as `-1,234.50`, `+£400.71`, `£-3.01` or
/// `12.00 GBP` into an exact decimal.
pub fn parse_amount(raw: &str) -> Result<Decimal, NormalizeError> {
    let err = || NormalizeError::Amount {
        raw: raw.to_string(),
    };

    let s = raw.trim();
    let s = s
        .strip_suffix("GBP")
        .or_else(|| s.strip_suffix("gbp"))
        .unwrap_or(s)
        .trim_end();

    // The sign may sit on either side of the currency symbol, but only once.
    let (outer, s) = split_sign(s);
    let s = s.strip_prefix(CURRENCY_SYMBOLS).unwrap_or(s);
    let (inner, s) = split_sign(s);
    let negative = match (outer, inner) {
        (Some(_), Some(_)) => return Err(err()),
        (Some(neg), None) | (None, Some(neg)) => neg,
        (None, None) => false,
    };

    if !AMOUNT_RE.is_match(s) {
        return Err(err());
    }

    let value = Decimal::from_str(&s.replace(',', "")).map_err(|_| err())?;
    Ok(if negative { -value } else { value })
}

/// Two decimal places, half away from zero, no currency symbol.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}
