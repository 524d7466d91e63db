//! CLI command implementations.

mod ask;
mod config;
mod ingest;
mod init;
mod list;
mod search;

pub use ask::run_ask;
pub use config::run_config;
pub use ingest::run_ingest;
pub use init::run_init;
pub use list::run_list;
pub use search::run_search;
