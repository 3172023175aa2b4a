//! banksum-core: normalized statement records, error kinds, and the shared
//! date/amount normalizer used by every vendor parser.

pub mod error;
pub mod normalize;
pub mod record;

pub use error::{NormalizeError, StatementError};
pub use normalize::{format_amount, format_date, parse_amount, parse_date, DateFormat};
pub use record::{SortOrder, Statement, TransactionRecord};
