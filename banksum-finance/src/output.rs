//! CSV rendering for the balance table and the weekly report.
//!
//! Dates are written `DD-MM-YYYY`, money with two decimal places and no
//! currency symbol, unknown balances as empty cells.

use std::io::Write;

use banksum_core::{DateFormat, format_amount, format_date};

use crate::balance_table::BalanceTable;
use crate::weekly_report::WeeklyReport;

/// Writes the balance table as CSV.
///
/// ```csv
/// Date,current.csv,savings.txt,total
/// 01-03-2024,90.00,,90.00
/// 02-03-2024,110.00,50.00,160.00
/// ```
pub fn write_balance_csv<W: Write>(writer: W, table: &BalanceTable) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Date"];
    header.extend(table.sources.iter().map(String::as_str));
    header.push("total");
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut out = Vec::with_capacity(row.balances.len() + 2);
        out.push(format_date(row.date, DateFormat::DayMonthYearDash));
        out.extend(row.balances.iter().map(|cell| match cell {
            Some(balance) => format_amount(*balance),
            None => String::new(),
        }));
        out.push(format_amount(row.total));
        wtr.write_record(&out)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the weekly report as CSV.
///
/// ```csv
/// Week,inflow,outflow,groceries,uncategorized,total
/// 15-01-2018,100.00,9.00,-5.00,96.00,91.00
/// ```
pub fn write_weekly_csv<W: Write>(writer: W, report: &WeeklyReport) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Week", "inflow", "outflow"];
    header.extend(report.categories.iter().map(String::as_str));
    header.push("total");
    wtr.write_record(&header)?;

    for bucket in &report.buckets {
        let mut out = vec![
            format_date(bucket.week_start, DateFormat::DayMonthYearDash),
            format_amount(bucket.inflow),
            format_amount(bucket.outflow),
        ];
        out.extend(report.categories.iter().map(|c| format_amount(bucket.category_total(c))));
        out.push(format_amount(bucket.net));
        wtr.write_record(&out)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance_table::{BalanceOptions, build_balance_table};
    use crate::category_rules::{CategoryRule, CategoryRules};
    use crate::weekly_report::build_weekly_report;
    use banksum_core::{Statement, TransactionRecord};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn render_balance(table: &BalanceTable) -> String {
        let mut buf = Vec::new();
        write_balance_csv(&mut buf, table).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_balance_csv_layout() {
        let current = Statement::new(
            "current.csv",
            vec![
                TransactionRecord::new(ymd(2024, 3, 1), dec!(-10), "current.csv").with_balance(dec!(90)),
                TransactionRecord::new(ymd(2024, 3, 2), dec!(20), "current.csv").with_balance(dec!(110)),
            ],
        );
        let savings = Statement::new(
            "savings.txt",
            vec![TransactionRecord::new(ymd(2024, 3, 2), dec!(50), "savings.txt").with_balance(dec!(50.5))],
        );
        let table = build_balance_table(&[current, savings], &BalanceOptions::default());

        assert_eq!(
            render_balance(&table),
            "Date,current.csv,savings.txt,total\n\
             01-03-2024,90.00,,90.00\n\
             02-03-2024,110.00,50.50,160.50\n"
        );
    }

    #[test]
    fn test_weekly_csv_layout() {
        let rules = CategoryRules::new(vec![CategoryRule::new("groceries", &["TESCO"])]);
        let records = vec![
            TransactionRecord::new(ymd(2018, 1, 16), dec!(100), "a").with_description("SALARY"),
            TransactionRecord::new(ymd(2018, 1, 17), dec!(-5), "a").with_description("TESCO"),
            TransactionRecord::new(ymd(2018, 1, 18), dec!(-4), "b"),
        ];
        let report = build_weekly_report(&records, &rules);

        let mut buf = Vec::new();
        write_weekly_csv(&mut buf, &report).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Week,inflow,outflow,groceries,uncategorized,total\n\
             15-01-2018,100.00,9.00,-5.00,96.00,91.00\n"
        );
    }

    #[test]
    fn test_weekly_csv_without_rules_has_no_category_columns() {
        let records = vec![TransactionRecord::new(ymd(2018, 1, 16), dec!(-1.5), "a")];
        let report = build_weekly_report(&records, &CategoryRules::default());

        let mut buf = Vec::new();
        write_weekly_csv(&mut buf, &report).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Week,inflow,outflow,total\n15-01-2018,0.00,1.50,-1.50\n"
        );
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let table = build_balance_table(&[], &BalanceOptions::default());
        assert_eq!(render_balance(&table), "Date,total\n");
    }
}
