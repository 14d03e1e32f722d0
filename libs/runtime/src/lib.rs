//! Process-level plumbing shared by binaries: layered configuration and
//! logging setup.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, QueryConfig,
    Section,
};
pub use logging::init_logging_from_config;
