//! Santander plain-text statement parser
//!
//! Expected text (ISO-8859, labels followed by a non-breaking space):
//!   From: 01/01/2018 to 31/01/2018
//!
//!   Account: XXXX XXXX XXXX 1234
//!
//!   Date: 31/01/2018
//!   Description: CARD PAYMENT TO TESCO
//!   Amount: -10.00 GBP
//!   Balance: 1234.56 GBP
//!
//! Export length varies, so transactions are recognized by their labels
//! rather than by line offsets.

use std::sync::LazyLock;

use banksum_core::{DateFormat, StatementError, TransactionRecord, parse_amount, parse_date};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<label>Date|Description|Amount|Balance):(?P<value>.*)$")
        .expect("field pattern compiles")
});

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^From:\s*\S").expect("period pattern compiles"));

/// A transaction whose label lines have only partly been read.
struct Pending {
    line: usize,
    date: NaiveDate,
    description: Option<String>,
    amount: Option<Decimal>,
}

/// Parse decoded Santander text into records, in file order.
pub fn parse_santander_text(source: &str, text: &str) -> Result<Vec<TransactionRecord>, StatementError> {
    let mut seen_period = false;
    let mut pending: Option<Pending> = None;
    let mut out = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = FIELD_RE.captures(line) else {
            if let Some(p) = &pending {
                return Err(StatementError::format(
                    source,
                    Some(lineno),
                    format!("unexpected line inside the transaction starting at line {}", p.line),
                ));
            }
            if PERIOD_RE.is_match(line) {
                seen_period = true;
            }
            // header or trailer text
            continue;
        };

        let label = &caps["label"];
        let value = caps["value"].trim();
        let out_of_order = || {
            StatementError::format(source, Some(lineno), format!("unexpected '{label}:' line"))
        };

        match label {
            "Date" => {
                if pending.is_some() {
                    return Err(out_of_order());
                }
                if !seen_period {
                    return Err(StatementError::format(
                        source,
                        Some(lineno),
                        "transaction before the 'From:' statement period header",
                    ));
                }
                let date = parse_date(value, DateFormat::DayMonthYearSlash)
                    .map_err(|e| StatementError::at(source, lineno, e))?;
                pending = Some(Pending {
                    line: lineno,
                    date,
                    description: None,
                    amount: None,
                });
            }
            "Description" => match pending.as_mut() {
                Some(p) if p.description.is_none() && p.amount.is_none() => {
                    p.description = Some(value.to_string());
                }
                _ => return Err(out_of_order()),
            },
            "Amount" => match pending.as_mut() {
                Some(p) if p.description.is_some() && p.amount.is_none() => {
                    p.amount = Some(parse_amount(value).map_err(|e| StatementError::at(source, lineno, e))?);
                }
                _ => return Err(out_of_order()),
            },
            _ => {
                let Some(Pending {
                    date,
                    description,
                    amount: Some(amount),
                    ..
                }) = pending.take()
                else {
                    return Err(out_of_order());
                };
                let balance = parse_amount(value).map_err(|e| StatementError::at(source, lineno, e))?;
                out.push(
                    TransactionRecord::new(date, amount, source)
                        .with_balance(balance)
                        .with_description(description.unwrap_or_default())
                        .at_line(lineno),
                );
            }
        }
    }

    if let Some(p) = pending {
        return Err(StatementError::format(
            source,
            Some(p.line),
            "transaction is cut off at end of file",
        ));
    }
    if !seen_period {
        return Err(StatementError::format(
            source,
            None,
            "missing 'From:' statement period header",
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "From:\u{a0}01/01/2018 to 31/01/2018\n\
\n\
Account:\u{a0}XXXX XXXX XXXX 1234\n\
\n\
Date:\u{a0}31/01/2018\n\
Description:\u{a0}CARD PAYMENT TO TESCO\n\
Amount:\u{a0}-10.00\u{a0}\n\
Balance:\u{a0}1,234.56\u{a0}\n\
\n\
Date:\u{a0}15/01/2018\n\
Description:\u{a0}BANK GIRO CREDIT REF ACME LTD\n\
Amount:\u{a0}1500.00 GBP\n\
Balance:\u{a0}1244.56 GBP\n\
\n\
\n";

    #[test]
    fn test_parses_sample() {
        let txns = parse_santander_text("savings.txt", SAMPLE).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2018, 1, 31).unwrap());
        assert_eq!(txns[0].amount, dec!(-10.00));
        assert_eq!(txns[0].balance, Some(dec!(1234.56)));
        assert_eq!(txns[0].description.as_deref(), Some("CARD PAYMENT TO TESCO"));
        assert_eq!(txns[1].amount, dec!(1500.00));
        assert_eq!(txns[1].balance, Some(dec!(1244.56)));
        assert_eq!(txns[1].line, Some(13));
    }

    #[test]
    fn test_skips_trailer_lines() {
        let text = format!("{SAMPLE}End of statement\nPage 1 of 1\n");
        let txns = parse_santander_text("savings.txt", &text).unwrap();
        assert_eq!(txns.len(), 2);
    }

    #[test]
    fn test_missing_period_header_is_format_error() {
        let text = "Account: 1234\n\nDate: 31/01/2018\nDescription: X\nAmount: 1.00\nBalance: 2.00\n";
        let err = parse_santander_text("savings.txt", text).unwrap_err();
        assert!(matches!(err, StatementError::Format { line: Some(3), .. }), "{err}");
        assert!(err.to_string().starts_with("savings.txt:3"));
    }

    #[test]
    fn test_out_of_order_label_is_format_error() {
        let text = "From: 01/01/2018 to 31/01/2018\n\nDate: 31/01/2018\nAmount: 1.00\n";
        let err = parse_santander_text("savings.txt", text).unwrap_err();
        assert!(matches!(err, StatementError::Format { line: Some(4), .. }), "{err}");
    }

    #[test]
    fn test_truncated_transaction_is_format_error() {
        let text = "From: 01/01/2018 to 31/01/2018\n\nDate: 31/01/2018\nDescription: X\nAmount: 1.00\n";
        let err = parse_santander_text("savings.txt", text).unwrap_err();
        assert!(matches!(err, StatementError::Format { line: Some(3), .. }), "{err}");
    }

    #[test]
    fn test_stray_line_inside_transaction() {
        let text = "From: 01/01/2018 to 31/01/2018\nDate: 31/01/2018\nDescription: X\nnoise\n";
        let err = parse_santander_text("savings.txt", text).unwrap_err();
        assert!(matches!(err, StatementError::Format { line: Some(4), .. }), "{err}");
    }

    #[test]
    fn test_bad_balance_is_amount_error() {
        let text = "From: 01/01/2018 to 31/01/2018\nDate: 31/01/2018\nDescription: X\nAmount: 1.00\nBalance: n/a\n";
        let err = parse_santander_text("savings.txt", text).unwrap_err();
        assert!(matches!(err, StatementError::AmountFormat { line: 5, .. }), "{err}");
    }
}
