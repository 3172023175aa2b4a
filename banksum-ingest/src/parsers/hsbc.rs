//! HSBC CSV statement parser
//!
//! Rows are `date, description, signed amount`, newest first, with no
//! running balance:
//!   25/12/2017,My description here   VIS,"-50.65"
//!   20/10/2017,Other description   VIS,"-1,234.50"
//!
//! An optional `Date,Description,Amount` header row is accepted.

use banksum_core::{DateFormat, StatementError, TransactionRecord, parse_amount, parse_date};

use super::{csv_error, csv_line, is_blank};

const HEADER: [&str; 3] = ["Date", "Description", "Amount"];

fn check_header(source: &str, record: &csv::StringRecord) -> Result<(), StatementError> {
    let matches = HEADER
        .iter()
        .enumerate()
        .all(|(i, name)| record.get(i).is_some_and(|f| f.trim().eq_ignore_ascii_case(name)));
    if !matches {
        return Err(StatementError::format(
            source,
            Some(csv_line(record)),
            format!("unexpected HSBC header (expected {})", HEADER.join(",")),
        ));
    }
    Ok(())
}

/// Parse HSBC CSV text into records, in file order. Balances are left empty.
pub fn parse_hsbc_text(source: &str, text: &str) -> Result<Vec<TransactionRecord>, StatementError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut first = true;
    let mut out = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(source, e))?;
        if is_blank(&record) {
            continue;
        }
        let line = csv_line(&record);

        if std::mem::take(&mut first)
            && record.get(0).is_some_and(|f| f.trim().eq_ignore_ascii_case("date"))
        {
            check_header(source, &record)?;
            continue;
        }

        if record.len() < HEADER.len() {
            return Err(StatementError::format(
                source,
                Some(line),
                format!(
                    "expected {} columns (date, description, amount), found {}",
                    HEADER.len(),
                    record.len()
                ),
            ));
        }

        // Exporters pad rows with empty trailing fields; anything else past
        // the amount is an unquoted amount split on its thousands separator.
        if let Some(extra) = record.iter().skip(HEADER.len()).find(|f| !f.trim().is_empty()) {
            return Err(StatementError::format(
                source,
                Some(line),
                format!("unexpected value {extra:?} after the amount column"),
            ));
        }

        let at = |e| StatementError::at(source, line, e);
        let date = parse_date(&record[0], DateFormat::DayMonthYearSlash).map_err(at)?;
        let amount = parse_amount(&record[2]).map_err(at)?;

        out.push(
            TransactionRecord::new(date, amount, source)
                .with_description(record[1].trim())
                .at_line(line),
        );
    }

    Ok(out)
}
