use clap::{Args, Subcommand};

use super::OutputFormat;
use sharelist::{ShareList, User};

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Register a user (no-op if the id already exists)
    Add {
        /// User id
        id: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Display name (defaults to the email)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show a user by id
    Show {
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Find a user by email address
    Find {
        email: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl UserCommand {
    pub async fn run(&self, app: &ShareList) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UserSubcommand::Add { id, email, name } => {
                if email.trim().is_empty() {
                    return Err("Email cannot be empty".into());
                }
                let user = User::new(id.trim(), email, name.clone().unwrap_or_default());
                let stored = app.register_user(&user).await?;
                println!("User: {}", stored);
                Ok(())
            }

            UserSubcommand::Show { id, format } => {
                let user = app.user(id).await?;
                print_user(&user, format)
            }

            UserSubcommand::Find { email, format } => match app.find_user_by_email(email).await? {
                Some(user) => print_user(&user, format),
                None => Err(format!("No user with email: {}", email.trim()).into()),
            },
        }
    }
}

fn print_user(user: &User, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(user)?),
        OutputFormat::Text => println!("{}", user),
    }
    Ok(())
}
