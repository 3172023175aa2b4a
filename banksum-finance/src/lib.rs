//! banksum-finance: balance table aggregation, weekly spending report,
//! category rules, and CSV output.

pub mod balance_table;
pub mod category_rules;
pub mod output;
pub mod weekly_report;

pub use balance_table::{BalanceOptions, BalanceRow, BalanceTable, HsbcBalance, build_balance_table};
pub use category_rules::{CategoryRule, CategoryRules, UNCATEGORIZED};
pub use output::{write_balance_csv, write_weekly_csv};
pub use weekly_report::{WeeklyBucket, WeeklyReport, build_weekly_report, week_start};
