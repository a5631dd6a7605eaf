pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod error;
pub mod utils;

pub use cli::{
    Cli, Commands, ConfigCommands, IpInfoArgs, OutputFormat, PasswordArgs, QrArgs, QrContent,
};
pub use commands::CommandHandler;
pub use config::{CliConfig, ConfigManager};
pub use error::{CliError, Result};
