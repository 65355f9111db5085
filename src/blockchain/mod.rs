pub mod chain_reader;
pub mod rpc_client;
pub mod scanner;
pub mod units;

pub use chain_reader::{format_block_number, parse_hex_quantity, ChainError, ChainReader};
pub use rpc_client::{RpcClient, RpcError};
pub use scanner::{BlockScanner, ConsoleSink, FixedDelay, MatchSink, Pacer};
pub use units::{wei_hex_to_ether, ConversionError};
