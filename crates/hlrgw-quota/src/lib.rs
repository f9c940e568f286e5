pub mod error;
pub mod ledger;
pub mod store;

pub use error::{QuotaError, Result};
pub use ledger::{parse_utc_offset, Admission, QuotaLedger, Usage};
pub use store::{MemoryStore, UsageStore};
