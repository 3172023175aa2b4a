//! Daily balance table: one column per statement file, carry-forward
//! balances, and a total column.

use std::collections::BTreeSet;

use banksum_core::Statement;
use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What to do with accounts whose export has no running balance (HSBC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HsbcBalance {
    /// Cumulative sum of amounts in date order, starting from zero.
    #[default]
    Derived,
    /// Leave the account out of the table.
    Omit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceOptions {
    pub hsbc_balance: HsbcBalance,
    /// Emit every calendar day between the first and last date, not only
    /// days with a transaction.
    pub fill_calendar_days: bool,
    /// Start at the first date on which every account has a known balance.
    pub from_common_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    pub date: NaiveDate,
    /// One cell per column; `None` before the account's first record.
    pub balances: Vec<Option<Decimal>>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceTable {
    /// Column labels (statement file names), in input order.
    pub sources: Vec<String>,
    pub rows: Vec<BalanceRow>,
}

/// End-of-day balances of one account, ascending by date.
fn end_of_day_series(statement: &Statement) -> Vec<(NaiveDate, Decimal)> {
    let mut series: Vec<(NaiveDate, Decimal)> = Vec::new();
    for record in statement.chronological() {
        let Some(balance) = record.balance else {
            continue;
        };
        match series.last_mut() {
            Some((date, last)) if *date == record.date => *last = balance,
            _ => series.push((record.date, balance)),
        }
    }
    series
}

fn calendar_days(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|d| *d <= last).collect()
}

/// Merge per-file statements into one date-indexed table.
///
/// Each column keeps a cursor into its own end-of-day series and walks it in
/// step with the ascending date union, so a cell holds the latest balance
/// known on that date.
pub fn build_balance_table(statements: &[Statement], opts: &BalanceOptions) -> BalanceTable {
    let mut sources = Vec::new();
    let mut columns: Vec<Vec<(NaiveDate, Decimal)>> = Vec::new();

    for statement in statements {
        let series = if statement.has_balances() {
            end_of_day_series(statement)
        } else {
            match opts.hsbc_balance {
                HsbcBalance::Omit => {
                    info!("{}: no running balance, left out of the balance table", statement.source);
                    continue;
                }
                HsbcBalance::Derived => {
                    let mut derived = statement.clone();
                    derived.derive_balances();
                    end_of_day_series(&derived)
                }
            }
        };
        sources.push(statement.source.clone());
        columns.push(series);
    }

    let union: BTreeSet<NaiveDate> = columns.iter().flatten().map(|(d, _)| *d).collect();
    let mut dates: Vec<NaiveDate> = match (union.first(), union.last()) {
        (Some(&first), Some(&last)) if opts.fill_calendar_days => calendar_days(first, last),
        _ => union.into_iter().collect(),
    };

    if opts.from_common_start
        && let Some(start) = columns.iter().filter_map(|c| c.first().map(|(d, _)| *d)).max()
    {
        dates.retain(|d| *d >= start);
    }

    let mut cursors = vec![0usize; columns.len()];
    let mut current: Vec<Option<Decimal>> = vec![None; columns.len()];
    let mut rows = Vec::with_capacity(dates.len());

    for date in dates {
        for (col, series) in columns.iter().enumerate() {
            while let Some(&(d, balance)) = series.get(cursors[col]) {
                if d > date {
                    break;
                }
                current[col] = Some(balance);
                cursors[col] += 1;
            }
        }
        let total = current.iter().flatten().sum();
        rows.push(BalanceRow {
            date,
            balances: current.clone(),
            total,
        });
    }

    BalanceTable { sources, rows }
}
