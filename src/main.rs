use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ConfigCommand, FriendCommand, ShopCommand, UserCommand};
use sharelist::config::Config;
use sharelist::{init_db, ShareList};

#[derive(Parser)]
#[command(name = "sharelist")]
#[command(version)]
#[command(about = "Shared shopping lists with friends", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// User id to act as (overrides SHARELIST_USER and the config file)
    #[arg(long, short, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register and look up users
    User(UserCommand),

    /// Send, answer and list friend requests
    Friend(FriendCommand),

    /// Create, list and share shops
    Shop(ShopCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "sharelist=warn".into()),
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

    let config = Config::load(cli.config)?.with_user(cli.user);

    match cli.command {
        Some(Commands::User(cmd)) => {
            let app = open(&config).await?;
            cmd.run(&app).await?;
        }
        Some(Commands::Friend(cmd)) => {
            let app = open(&config).await?;
            cmd.run(&app, config.require_user()?).await?;
        }
        Some(Commands::Shop(cmd)) => {
            let app = open(&config).await?;
            cmd.run(&app, config.require_user()?).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

async fn open(config: &Config) -> Result<ShareList, sqlx::Error> {
    let pool = init_db(&config.database_path.value).await?;
    Ok(ShareList::from_pool(pool))
}
