//! Sharelist Admin CLI
//!
//! Mints API keys for the server config file.
//!
//! # Usage
//!
//! ```bash
//! sharelist-admin key new --user-id alice --email alice@example.com --name Alice
//! ```
//!
//! The printed snippet goes under `api_keys:` in the server config.

use clap::{Args, Parser, Subcommand};

use sharelist::server::{generate_api_key, ApiKeyEntry, ServerConfigFile};

#[derive(Parser)]
#[command(name = "sharelist-admin")]
#[command(version)]
#[command(about = "Sharelist server administration tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API keys
    Key(KeyCommand),
}

#[derive(Args)]
struct KeyCommand {
    #[command(subcommand)]
    command: KeySubcommand,
}

#[derive(Subcommand)]
enum KeySubcommand {
    /// Generate a key for a user
    New {
        /// User id the key authenticates as
        #[arg(long)]
        user_id: String,
        /// User's email address
        #[arg(long)]
        email: String,
        /// User's display name
        #[arg(long, short)]
        name: Option<String>,
    },
}

fn new_key(
    user_id: String,
    email: String,
    name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if user_id.trim().is_empty() || email.trim().is_empty() {
        return Err("user id and email are required".into());
    }

    let snippet = ServerConfigFile {
        api_keys: vec![ApiKeyEntry {
            key: generate_api_key(),
            user_id: user_id.trim().to_string(),
            email: email.trim().to_string(),
            display_name: name,
        }],
    };

    print!("{}", serde_yaml::to_string(&snippet)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Key(key_cmd) => match key_cmd.command {
            KeySubcommand::New {
                user_id,
                email,
                name,
            } => new_key(user_id, email, name),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
