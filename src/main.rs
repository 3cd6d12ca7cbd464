use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod db;

use commands::{
    ConfigCommand, DataCommand, DishCommand, IngredientCommand, MenuCommand, TagCommand,
};
use config::Config;
use db::{init_db, KvRepository, MenuRepository};

#[derive(Parser)]
#[command(name = "weekmenu")]
#[command(version)]
#[command(about = "Plan a week of home cooking", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the dish catalog
    Dish(DishCommand),

    /// Manage tags
    Tag(TagCommand),

    /// Manage ingredients
    Ingredient(IngredientCommand),

    /// View and arrange the weekly menu
    Menu(MenuCommand),

    /// Export, import or reset saved data
    Data(DataCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let pool = init_db(&config.database_path.value).await?;
    let repo = MenuRepository::new(KvRepository::new(pool), config.storage_key.value.clone());

    match command {
        Commands::Dish(cmd) => cmd.run(&repo).await,
        Commands::Tag(cmd) => cmd.run(&repo).await,
        Commands::Ingredient(cmd) => cmd.run(&repo).await,
        Commands::Menu(cmd) => cmd.run(&repo).await,
        Commands::Data(cmd) => cmd.run(&repo).await,
        Commands::Config(cmd) => cmd.run(&config),
    }
}
