//! CLI command implementations

mod config;
mod index;
mod search;

pub use config::cmd_config_show;
pub use index::cmd_index;
pub use search::cmd_search;
