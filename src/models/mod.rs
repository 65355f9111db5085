pub mod block;
pub mod scan;

pub use block::{Block, Transaction};
pub use scan::{MatchedTransaction, ScanRange, ScanSummary};
