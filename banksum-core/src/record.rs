//! Normalized statement records (bank-agnostic).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StatementError;
use crate::normalize::format_amount;

/// One transaction line from a statement file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    /// Negative = money out, positive = money in.
    pub amount: Decimal,
    /// Running balance after this transaction, when the bank exports one.
    pub balance: Option<Decimal>,
    pub description: Option<String>,
    /// File name the record was read from; used as the column label.
    pub source: String,
    /// Account the row belongs to, for exports that mix several accounts.
    #[serde(default)]
    pub account: Option<String>,
    /// 1-based line in the source file.
    #[serde(default)]
    pub line: Option<usize>,
}

impl TransactionRecord {
    pub fn new(date: NaiveDate, amount: Decimal, source: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            balance: None,
            description: None,
            source: source.into(),
            account: None,
            line: None,
        }
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.is_empty() {
            self.description = Some(description);
        }
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        let account = account.into();
        if !account.is_empty() {
            self.account = Some(account);
        }
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Direction in which a file lists its transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Every record parsed from one file, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub source: String,
    pub order: SortOrder,
    pub records: Vec<TransactionRecord>,
}

/// First record whose running balance does not follow from its neighbour
/// when the records are read in `order`, with the balance it should have.
fn balance_mismatch(records: &[TransactionRecord], order: SortOrder) -> Option<(usize, Decimal)> {
    records.windows(2).enumerate().find_map(|(i, pair)| {
        let (earlier, later, at) = match order {
            SortOrder::Ascending => (&pair[0], &pair[1], i + 1),
            SortOrder::Descending => (&pair[1], &pair[0], i),
        };
        let expected = earlier.balance? + later.amount;
        (later.balance? != expected).then_some((at, expected))
    })
}

impl Statement {
    /// Builds a statement and detects its listing order.
    ///
    /// When every record has a running balance, the order is the direction in
    /// which `previous balance + amount = balance` holds. Otherwise (or when
    /// both directions fit) the first and last dates decide; single-day and
    /// empty files count as ascending.
    pub fn new(source: impl Into<String>, records: Vec<TransactionRecord>) -> Self {
        let by_balance = if records.len() > 1 && records.iter().all(|r| r.balance.is_some()) {
            match (
                balance_mismatch(&records, SortOrder::Ascending).is_none(),
                balance_mismatch(&records, SortOrder::Descending).is_none(),
            ) {
                (true, false) => Some(SortOrder::Ascending),
                (false, true) => Some(SortOrder::Descending),
                _ => None,
            }
        } else {
            None
        };
        let order = by_balance.unwrap_or(match (records.first(), records.last()) {
            (Some(first), Some(last)) if first.date > last.date => SortOrder::Descending,
            _ => SortOrder::Ascending,
        });
        Self {
            source: source.into(),
            order,
            records,
        }
    }

    /// Splits one file's records into statements, one per account.
    ///
    /// A file holding a single account (or none named) keeps the file name as
    /// its label; otherwise each account becomes `file:account`, in order of
    /// first appearance. Every statement's running balance is checked.
    pub fn from_file(
        source: &str,
        records: Vec<TransactionRecord>,
    ) -> Result<Vec<Statement>, StatementError> {
        let mut groups: Vec<(Option<String>, Vec<TransactionRecord>)> = Vec::new();
        for record in records {
            match groups.iter_mut().find(|(account, _)| *account == record.account) {
                Some((_, group)) => group.push(record),
                None => groups.push((record.account.clone(), vec![record])),
            }
        }
        if groups.is_empty() {
            groups.push((None, Vec::new()));
        }

        let split = groups.len() > 1;
        groups
            .into_iter()
            .map(|(account, mut records)| {
                let label = match account {
                    Some(account) if split => format!("{source}:{account}"),
                    _ => source.to_string(),
                };
                for record in &mut records {
                    record.source.clone_from(&label);
                }
                let statement = Statement::new(label, records);
                statement.check_running_balance()?;
                Ok(statement)
            })
            .collect()
    }

    /// Verifies that consecutive balances agree with the amounts in the
    /// detected order. Statements without balances always pass.
    pub fn check_running_balance(&self) -> Result<(), StatementError> {
        if !self.has_balances() {
            return Ok(());
        }
        match balance_mismatch(&self.records, self.order) {
            None => Ok(()),
            Some((i, expected)) => {
                let record = &self.records[i];
                let actual = record.balance.unwrap_or_default();
                Err(StatementError::format(
                    &self.source,
                    record.line,
                    format!(
                        "balance {} does not follow from the previous balance and amount {} (expected {})",
                        format_amount(actual),
                        format_amount(record.amount),
                        format_amount(expected)
                    ),
                ))
            }
        }
    }

    /// Records oldest first. Same-day records keep the order in which they
    /// happened, so the last one on a date holds the end-of-day balance.
    pub fn chronological(&self) -> Vec<&TransactionRecord> {
        let mut out: Vec<&TransactionRecord> = match self.order {
            SortOrder::Ascending => self.records.iter().collect(),
            SortOrder::Descending => self.records.iter().rev().collect(),
        };
        out.sort_by_key(|r| r.date);
        out
    }

    /// True when every record carries a running balance.
    pub fn has_balances(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(|r| r.balance.is_some())
    }

    /// Fills in a running balance from cumulative amounts, starting at zero
    /// before the oldest record. Used for exports without a balance column.
    pub fn derive_balances(&mut self) {
        let mut indices: Vec<usize> = (0..self.records.len()).collect();
        if self.order == SortOrder::Descending {
            indices.reverse();
        }
        indices.sort_by_key(|&i| self.records[i].date);

        let mut running = Decimal::ZERO;
        for i in indices {
            running += self.records[i].amount;
            self.records[i].balance = Some(running);
        }
    }
}
