//! Weekly spending report: Monday-aligned buckets over every record from
//! every account.

use std::collections::BTreeMap;

use banksum_core::TransactionRecord;
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::category_rules::{CategoryRules, UNCATEGORIZED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyBucket {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Sum of positive amounts.
    pub inflow: Decimal,
    /// Money out, as a positive number.
    pub outflow: Decimal,
    /// `inflow - outflow`, i.e. the sum of all amounts.
    pub net: Decimal,
    /// Net amount per category.
    pub by_category: BTreeMap<String, Decimal>,
}

impl WeeklyBucket {
    fn empty(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            inflow: Decimal::ZERO,
            outflow: Decimal::ZERO,
            net: Decimal::ZERO,
            by_category: BTreeMap::new(),
        }
    }

    fn add(&mut self, amount: Decimal, category: &str) {
        if amount.is_sign_negative() {
            self.outflow -= amount;
        } else {
            self.inflow += amount;
        }
        self.net += amount;
        *self.by_category.entry(category.to_string()).or_default() += amount;
    }

    pub fn category_total(&self, category: &str) -> Decimal {
        self.by_category.get(category).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    /// Report columns: rule categories then `uncategorized`; empty when no
    /// rules were supplied.
    pub categories: Vec<String>,
    /// Contiguous weeks, ascending.
    pub buckets: Vec<WeeklyBucket>,
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn build_weekly_report<'a, I>(records: I, rules: &CategoryRules) -> WeeklyReport
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut weeks: BTreeMap<NaiveDate, WeeklyBucket> = BTreeMap::new();
    for record in records {
        let start = week_start(record.date);
        let category = rules.categorize(record.description.as_deref());
        weeks
            .entry(start)
            .or_insert_with(|| WeeklyBucket::empty(start))
            .add(record.amount, category);
    }

    // Quiet weeks between the first and last show up as zero rows.
    let mut buckets = Vec::with_capacity(weeks.len());
    if let (Some(&first), Some(&last)) = (weeks.keys().next(), weeks.keys().next_back()) {
        let mut start = first;
        while start <= last {
            buckets.push(weeks.remove(&start).unwrap_or_else(|| WeeklyBucket::empty(start)));
            start += Duration::days(7);
        }
    }

    let categories = if rules.is_empty() {
        Vec::new()
    } else {
        let mut names = rules.names();
        if !names.iter().any(|n| n == UNCATEGORIZED) {
            names.push(UNCATEGORIZED.to_string());
        }
        names
    };

    WeeklyReport {
        categories,
        buckets,
    }
}
