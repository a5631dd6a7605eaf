use anyhow::Context;
use clap::Parser;
use colored::*;
use std::process;

use omni_cli::{Cli, CommandHandler, Commands, ConfigManager};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_manager = ConfigManager::new(cli.config.clone())
        .context("Failed to load configuration")?;

    let config = config_manager.get_config();
    setup_logging(cli.verbose, cli.quiet, &config.general.log_level);
    if !config.ui.color_output {
        colored::control::set_override(false);
    }

    let mut handler = CommandHandler::new(config_manager);
    if let Some(format) = cli.format {
        handler.set_output_format(format);
    }

    execute_command(handler, cli.command).await?;
    Ok(())
}

async fn execute_command(mut handler: CommandHandler, command: Commands) -> omni_cli::Result<()> {
    match command {
        Commands::Qr(args) => handler.generate_qr(args).await,
        Commands::Password(args) => handler.generate_passwords(args),
        Commands::IpInfo(args) => handler.show_ip_info(args).await,
        Commands::Config(config_cmd) => handler.handle_config_command(config_cmd),
        Commands::Completions { shell, output } => handler.generate_completions(shell, output),
    }
}

fn setup_logging(verbose: bool, quiet: bool, default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    if quiet {
        return; // No logging in quiet mode
    }

    let level = if verbose { "debug" } else { default_level };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
