//! robotree CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::Parser;
use robotree::cli::{Cli, Commands};
use robotree::commands::{config_command, parse_command, watch_command, ParseOptions};
use robotree::completion::{print_completion_script, ShellType, SUPPORTED_SHELLS};
use robotree::config::load_config;
use robotree::output::print_error;
use robotree::Result;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so they never mix with the tree or JSON on stdout.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Completions { shell } => match ShellType::from_name(&shell) {
            Ok(shell_type) => {
                print_completion_script(shell_type);
                Ok(())
            }
            Err(e) => {
                print_error(&format!(
                    "{}\nSupported shells: {}",
                    e,
                    SUPPORTED_SHELLS.join(", ")
                ));
                std::process::exit(1);
            }
        },

        Commands::Config { reset } => config_command(reset, cli.no_color),

        Commands::Parse {
            file,
            chunk,
            live,
            json,
            no_logs,
        } => {
            let config = load_config()?;
            let options = ParseOptions {
                chunk,
                live,
                json,
                show_logs: config.display.show_logs && !no_logs,
                color: config.display.color && !cli.no_color,
            };
            parse_command(&file, &options, &config)
        }

        Commands::Watch {
            file,
            interval,
            no_logs,
        } => {
            let config = load_config()?;
            watch_command(
                &file,
                interval,
                config.display.show_logs && !no_logs,
                config.display.color && !cli.no_color,
                &config,
            )
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
