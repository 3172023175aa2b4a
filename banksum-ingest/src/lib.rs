//! banksum-ingest: vendor statement parsers and statement-directory discovery.

pub mod discover;
pub mod parsers;
pub mod vendor;

pub use discover::{discover, load_all, StatementFile};
pub use vendor::Vendor;
