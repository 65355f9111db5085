pub mod cli;
pub mod http;

pub use cli::{Cli, CliError, CliHandler, Commands};
pub use http::{fetch_transactions, router, ApiError, ApiServer, AppState, FetchTransactionsQuery, ScanRequest};
