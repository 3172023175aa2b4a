//! Natwest CSV statement parser
//!
//! Two export layouts are recognized by header name:
//!   Date,Type,Description,Debit,Credit,Balance
//!   01/03/2024,,POS,10.00,,90.00
//!
//!   Date, Type, Description, Value, Balance, Account Name, Account Number
//!   25/12/2017,TYPE,"'Description, this is",-100.00,-200.05,"'Account, name","'012345",
//!
//! The second layout can interleave rows from several accounts; each row
//! carries its `Account Name` so the caller can split the file.

use banksum_core::{
    DateFormat, NormalizeError, StatementError, TransactionRecord, parse_amount, parse_date,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{csv_error, csv_line, is_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Amounts {
    DebitCredit { debit: usize, credit: usize },
    Value(usize),
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    description: usize,
    balance: usize,
    account: Option<usize>,
    amounts: Amounts,
}

fn find(header: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

impl Columns {
    fn from_header(source: &str, header: &csv::StringRecord) -> Result<Self, StatementError> {
        let line = Some(csv_line(header));
        let require = |label: &str, names: &[&str]| {
            find(header, names).ok_or_else(|| {
                StatementError::format(source, line, format!("missing column '{label}' in Natwest header"))
            })
        };

        let date = require("Date", &["Date"])?;
        require("Type", &["Type"])?;
        let description = require("Description", &["Description"])?;
        let balance = require("Balance", &["Balance"])?;
        let account = find(header, &["Account Name"]);

        let debit = find(header, &["Debit", "Paid out", "Debit Amount"]);
        let credit = find(header, &["Credit", "Paid in", "Credit Amount"]);
        let value = find(header, &["Value", "Amount"]);
        let amounts = match (debit, credit, value) {
            (Some(debit), Some(credit), _) => Amounts::DebitCredit { debit, credit },
            (None, None, Some(value)) => Amounts::Value(value),
            _ => {
                return Err(StatementError::format(
                    source,
                    line,
                    "missing amount columns (expected 'Debit' and 'Credit', or 'Value')",
                ));
            }
        };

        Ok(Self {
            date,
            description,
            balance,
            account,
            amounts,
        })
    }

    fn parse_row(&self, source: &str, row: &csv::StringRecord) -> Result<TransactionRecord, StatementError> {
        let line = csv_line(row);
        let field = |i: usize| row.get(i).unwrap_or("").trim();
        let at = |e: NormalizeError| StatementError::at(source, line, e);

        let date = parse_natwest_date(field(self.date)).map_err(at)?;
        let amount = match self.amounts {
            Amounts::Value(i) => parse_amount(field(i)).map_err(at)?,
            Amounts::DebitCredit { debit, credit } => {
                let debit = optional_amount(field(debit)).map_err(at)?;
                let credit = optional_amount(field(credit)).map_err(at)?;
                match (debit, credit) {
                    (None, None) => {
                        return Err(StatementError::format(
                            source,
                            Some(line),
                            "row has neither a debit nor a credit amount",
                        ));
                    }
                    (Some(d), Some(c)) if !d.is_zero() && !c.is_zero() => {
                        return Err(StatementError::format(
                            source,
                            Some(line),
                            "row has both a debit and a credit amount",
                        ));
                    }
                    (d, c) => c.unwrap_or_default() - d.unwrap_or_default(),
                }
            }
        };
        let balance = parse_amount(field(self.balance)).map_err(at)?;

        let mut record = TransactionRecord::new(date, amount, source)
            .with_balance(balance)
            .with_description(strip_quote(field(self.description)))
            .at_line(line);
        if let Some(i) = self.account {
            record = record.with_account(strip_quote(field(i)));
        }
        Ok(record)
    }
}

/// Natwest prefixes text cells with an apostrophe to stop spreadsheets
/// interpreting them.
fn strip_quote(cell: &str) -> &str {
    cell.strip_prefix('\'').unwrap_or(cell)
}

fn optional_amount(raw: &str) -> Result<Option<Decimal>, NormalizeError> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_amount(raw).map(Some)
}

/// `DD/MM/YYYY`, with `DD Mon YYYY` accepted from older exports.
fn parse_natwest_date(raw: &str) -> Result<NaiveDate, NormalizeError> {
    parse_date(raw, DateFormat::DayMonthYearSlash)
        .or_else(|err| parse_date(raw, DateFormat::DayShortMonthYear).map_err(|_| err))
}

/// Parse Natwest CSV text into records, in file order.
pub fn parse_natwest_text(source: &str, text: &str) -> Result<Vec<TransactionRecord>, StatementError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut columns: Option<Columns> = None;
    let mut out = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(source, e))?;
        if is_blank(&record) {
            continue;
        }

        if let Some(cols) = &columns {
            out.push(cols.parse_row(source, &record)?);
        } else {
            columns = Some(Columns::from_header(source, &record)?);
        }
    }

    if columns.is_none() {
        return Err(StatementError::format(source, None, "no Natwest header row found"));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_debit_credit_layout() {
        let text = "Date,Type,Description,Debit,Credit,Balance\n\
                    01/03/2024,,POS,10.00,,90.00\n\
                    02/03/2024,,POS,,20.00,110.00\n";

        let txns = parse_natwest_text("current.csv", text).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, ymd(2024, 3, 1));
        assert_eq!(txns[0].amount, dec!(-10.00));
        assert_eq!(txns[0].balance, Some(dec!(90.00)));
        assert_eq!(txns[1].date, ymd(2024, 3, 2));
        assert_eq!(txns[1].amount, dec!(20.00));
        assert_eq!(txns[1].balance, Some(dec!(110.00)));
        assert_eq!(txns[1].description.as_deref(), Some("POS"));
        assert_eq!(txns[1].source, "current.csv");
    }

    #[test]
    fn test_value_layout_with_quirks() {
        let text = r#"
Date, Type, Description, Value, Balance, Account Name, Account Number
25/12/2017,TYPE,"'Description, this is",-100.00,-200.05,"'Account, name","'012345",
02/01/2018,TYPE,"'Description, this is",50.04,-150.01,"'Account, name","'012345",

01/01/2018,TYPE,"'Description, this is",100.00,450.00,"'My other account","'999999",


"#;

        let txns = parse_natwest_text("natwest.csv", text).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].date, ymd(2017, 12, 25));
        assert_eq!(txns[0].amount, dec!(-100.00));
        assert_eq!(txns[0].balance, Some(dec!(-200.05)));
        assert_eq!(txns[0].description.as_deref(), Some("Description, this is"));
        assert_eq!(txns[0].account.as_deref(), Some("Account, name"));
        assert_eq!(txns[0].line, Some(3));
        assert_eq!(txns[2].amount, dec!(100.00));
        assert_eq!(txns[2].balance, Some(dec!(450.00)));
        assert_eq!(txns[2].account.as_deref(), Some("My other account"));
    }

    #[test]
    fn test_debit_credit_layout_has_no_account() {
        let text = "Date,Type,Description,Debit,Credit,Balance
01/03/2024,,POS,10.00,,90.00
";
        let txns = parse_natwest_text("current.csv", text).unwrap();
        assert_eq!(txns[0].account, None);
    }

    #[test]
    fn test_paid_in_paid_out_names_and_short_month_dates() {
        let text = "Date,Type,Description,Paid out,Paid in,Balance,Notes\n\
                    05 Jan 2018,DD,GYM,30.00,,70.00,x\n";
        let txns = parse_natwest_text("current.csv", text).unwrap();
        assert_eq!(txns[0].date, ymd(2018, 1, 5));
        assert_eq!(txns[0].amount, dec!(-30.00));
    }

    #[test]
    fn test_zero_debit_is_treated_as_empty() {
        let text = "Date,Type,Description,Debit,Credit,Balance\n\
                    01/03/2024,,PAY,0.00,20.00,110.00\n";
        let txns = parse_natwest_text("current.csv", text).unwrap();
        assert_eq!(txns[0].amount, dec!(20.00));
    }

    #[test]
    fn test_missing_balance_column_is_format_error() {
        let text = "Date,Type,Description,Debit,Credit\n01/03/2024,,POS,10.00,\n";
        let err = parse_natwest_text("current.csv", text).unwrap_err();
        assert!(matches!(err, StatementError::Format { .. }));
        let msg = err.to_string();
        assert!(msg.contains("current.csv"), "{msg}");
        assert!(msg.contains("Balance"), "{msg}");
    }

    #[test]
    fn test_missing_amount_columns_is_format_error() {
        let text = "Date,Type,Description,Money,Balance\n";
        let err = parse_natwest_text("current.csv", text).unwrap_err();
        assert!(matches!(err, StatementError::Format { line: Some(1), .. }));
    }

    #[test]
    fn test_bad_rows_fail_with_line_numbers() {
        let text = "Date,Type,Description,Debit,Credit,Balance\n\
                    01/03/2024,,POS,10.00,,90.00\n\
                    32/03/2024,,POS,10.00,,80.00\n";
        let err = parse_natwest_text("current.csv", text).unwrap_err();
        assert!(matches!(err, StatementError::DateFormat { line: 3, .. }), "{err}");

        let text = "Date,Type,Description,Debit,Credit,Balance\n\
                    01/03/2024,,POS,ten,,90.00\n";
        let err = parse_natwest_text("current.csv", text).unwrap_err();
        assert!(matches!(err, StatementError::AmountFormat { line: 2, .. }), "{err}");

        let text = "Date,Type,Description,Debit,Credit,Balance\n\
                    01/03/2024,,POS,10.00,5.00,90.00\n";
        let err = parse_natwest_text("current.csv", text).unwrap_err();
        assert!(matches!(err, StatementError::Format { line: Some(2), .. }), "{err}");
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let err = parse_natwest_text("current.csv", "\n\n").unwrap_err();
        assert!(matches!(err, StatementError::Format { line: None, .. }));
    }

    #[test]
    fn test_header_only_file_has_no_records() {
        let txns = parse_natwest_text("current.csv", "Date,Type,Description,Value,Balance\n").unwrap();
        assert!(txns.is_empty());
    }
}
