mod checks;
mod commands;
mod config_cmd;
mod run;
mod utils;

pub use checks::run_checks;
pub use commands::{Cli, Commands};
pub use config_cmd::show_config;
pub use run::run_gateway;
pub use utils::init_logging;
