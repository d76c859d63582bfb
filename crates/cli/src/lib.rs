pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "shoplist",
    about = "Shoplist operator CLI",
    long_about = "Apply catalog migrations, load demo fixtures, inspect configuration, and query suggestions.",
    after_help = "Examples:\n  shoplist migrate\n  shoplist seed\n  shoplist suggest items --starts-with mil\n  shoplist suggest addons --list shplst1000001 --engine BASIC"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and verify it")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Query the recommendation engine against the configured catalog")]
    Suggest {
        #[command(subcommand)]
        target: SuggestTarget,
    },
}

#[derive(Debug, Subcommand)]
enum SuggestTarget {
    #[command(about = "Active items whose name starts with a prefix")]
    Items {
        #[arg(long, help = "Name prefix, at least three characters")]
        starts_with: String,
        #[arg(long, help = "Maximum number of items to return")]
        limit: Option<u32>,
    },
    #[command(about = "Add-on suggestions for an existing shopping list")]
    Addons {
        #[arg(long = "list", help = "Shopping list code")]
        list: String,
        #[arg(long, default_value = "BASIC", help = "Strategy type")]
        engine: String,
        #[arg(long, help = "Maximum number of items to return")]
        limit: Option<u32>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Suggest { target: SuggestTarget::Items { starts_with, limit } } => {
            commands::suggest::items(&starts_with, limit)
        }
        Command::Suggest { target: SuggestTarget::Addons { list, engine, limit } } => {
            commands::suggest::add_ons(&list, &engine, limit)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
