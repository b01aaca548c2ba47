pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use greencart_core::config::LoadOptions;
use greencart_core::EngineConfig;

use commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "greencart",
    about = "Substitute recommendation and budget optimization over a catalog file",
    after_help = "Examples:\n  greencart recommend --catalog catalog.json --target p1\n  greencart suggest --catalog catalog.json --cart cart.json --mode ahorro\n  greencart optimize --catalog catalog.json --cart cart.json --budget 25000 --mode ambiente\n  greencart score --catalog catalog.json --item p1"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a greencart.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank cheaper or more sustainable substitutes for a catalog item")]
    Recommend(commands::recommend::RecommendArgs),
    #[command(about = "Suggest substitutes for every item in a cart at once")]
    Suggest(commands::suggest::SuggestArgs),
    #[command(about = "Assemble a budget-constrained cart that maximizes sustainability")]
    Optimize(commands::optimize::OptimizeArgs),
    #[command(about = "Score one item against catalog-wide normalizers")]
    Score(commands::score::ScoreArgs),
    #[command(about = "Inspect effective engine configuration with value sources")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match EngineConfig::load(LoadOptions { config_path: cli.config.clone() }) {
        Ok(config) => config,
        Err(error) => {
            let result =
                CommandResult::failure("config", "config_validation", error.to_string(), 2);
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(&args, &config),
        Command::Suggest(args) => commands::suggest::run(&args, &config),
        Command::Optimize(args) => commands::optimize::run(&args, &config),
        Command::Score(args) => commands::score::run(&args, &config),
        Command::Config => commands::config::run(cli.config.as_deref(), &config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
