use clap::{Args, Subcommand};
use uuid::Uuid;

use super::OutputFormat;
use sharelist::ShareList;

#[derive(Args)]
pub struct ShopCommand {
    #[command(subcommand)]
    pub command: ShopSubcommand,
}

#[derive(Subcommand)]
pub enum ShopSubcommand {
    /// Create a shop owned by you
    Create {
        /// Name of the shop
        name: String,
    },

    /// List shops you own or that are shared with you
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a shop's details
    Show {
        /// Shop ID
        id: Uuid,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Replace who a shop is shared with
    ///
    /// Without members (and without --clear) prints your friends and the
    /// current selection instead.
    Share {
        /// Shop ID
        id: Uuid,

        /// User ids to share with
        members: Vec<String>,

        /// Stop sharing with everyone
        #[arg(long, conflicts_with = "members")]
        clear: bool,
    },
}

impl ShopCommand {
    pub async fn run(
        &self,
        app: &ShareList,
        user_id: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ShopSubcommand::Create { name } => {
                let shop = app.create_shop(user_id, name).await?;
                println!("Created shop:");
                println!("{}", shop);
                Ok(())
            }

            ShopSubcommand::List { format } => {
                let shops = app.list_accessible_shops(user_id).await?;

                if shops.is_empty() {
                    println!("No shops found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&shops)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<36}  {:<30}  ACCESS", "ID", "NAME");
                        println!("{}", "-".repeat(80));
                        for entry in &shops {
                            let access = if entry.is_owner {
                                "owner".to_string()
                            } else {
                                format!("shared by {}", entry.shop.owner_id)
                            };
                            println!("{:<36}  {:<30}  {}", entry.id(), entry.shop.name, access);
                        }
                        println!("\nTotal: {} shop(s)", shops.len());
                    }
                }
                Ok(())
            }

            ShopSubcommand::Show { id, format } => {
                let entry = app.get_shop(user_id, *id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&entry)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", entry.shop);
                    }
                }
                Ok(())
            }

            ShopSubcommand::Share { id, members, clear } => {
                if members.is_empty() && !clear {
                    let view = app.sharing_view(user_id, *id).await?;
                    println!("Sharing {}", view.shop.name);
                    if view.friends.is_empty() {
                        println!("  (no friends to share with)");
                    }
                    for friend in &view.friends {
                        let mark = if view.selected.contains(&friend.id) {
                            "x"
                        } else {
                            " "
                        };
                        println!("  [{}] {}", mark, friend);
                    }
                    return Ok(());
                }

                app.update_shared_with(*id, user_id, members).await?;
                if members.is_empty() {
                    println!("Shop {} is no longer shared", id);
                } else {
                    println!("Shop {} shared with: {}", id, members.join(", "));
                }
                Ok(())
            }
        }
    }
}
