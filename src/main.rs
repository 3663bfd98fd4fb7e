use clap::Parser;
use pocket_ledger::args::{Args, BudgetSubcommand, Command};
use pocket_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config = Config::load_or_create(args.common().home().path()).await?;

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Add(add_args) => commands::add(config, add_args.clone()).await?.print(),
        Command::Delete(delete_args) => {
            commands::delete(config, delete_args.clone()).await?.print()
        }
        Command::List(list_args) => commands::list(config, list_args.clone()).await?.print(),
        Command::Summary => commands::summary(config).await?.print(),
        Command::Budget(budget_args) => match budget_args.action() {
            Some(BudgetSubcommand::New(new_args)) => {
                commands::new_budget(config, new_args.clone()).await?.print()
            }
            None => commands::budget(config, budget_args.clone()).await?.print(),
        },
        Command::Language(language_args) => {
            commands::language(config, language_args.clone())
                .await?
                .print()
        }
        Command::Theme(theme_args) => commands::theme(config, theme_args.clone()).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use the requested level for the library and this binary.
            EnvFilter::new(format!(
                "{}={level},{}={level}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                env!("CARGO_CRATE_NAME"),
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
