use clap::{Args, Subcommand};
use uuid::Uuid;

use super::OutputFormat;
use sharelist::{FriendshipRequest, ShareList};

#[derive(Args)]
pub struct FriendCommand {
    #[command(subcommand)]
    pub command: FriendSubcommand,
}

#[derive(Subcommand)]
pub enum FriendSubcommand {
    /// Send a friend request
    Request {
        /// Email address or user id of the receiver
        to: String,
    },

    /// List incoming pending requests
    Requests {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List requests you sent that are still pending
    Sent {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Accept an incoming request
    Accept {
        /// Request ID
        id: Uuid,
    },

    /// Reject an incoming request
    Reject {
        /// Request ID
        id: Uuid,
    },

    /// List friends
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl FriendCommand {
    pub async fn run(
        &self,
        app: &ShareList,
        user_id: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FriendSubcommand::Request { to } => {
                let request = app.send_friend_request(user_id, to).await?;
                println!("Sent friend request {}", request.id);
                Ok(())
            }

            FriendSubcommand::Requests { format } => {
                let requests = app.list_incoming_requests(user_id).await?;
                print_requests(&requests, format, "No pending requests")
            }

            FriendSubcommand::Sent { format } => {
                let requests = app.list_sent_requests(user_id).await?;
                print_requests(&requests, format, "No sent requests")
            }

            FriendSubcommand::Accept { id } => {
                app.accept_request(user_id, *id).await?;
                println!("Accepted request {}", id);
                Ok(())
            }

            FriendSubcommand::Reject { id } => {
                app.reject_request(user_id, *id).await?;
                println!("Rejected request {}", id);
                Ok(())
            }

            FriendSubcommand::List { format } => {
                let friends = app.list_friends(user_id).await?;

                if friends.is_empty() {
                    println!("No friends yet");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&friends)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<24}  {:<24}  EMAIL", "ID", "NAME");
                        println!("{}", "-".repeat(80));
                        for friend in &friends {
                            println!("{:<24}  {:<24}  {}", friend.id, friend.name, friend.email);
                        }
                        println!("\nTotal: {} friend(s)", friends.len());
                    }
                }
                Ok(())
            }
        }
    }
}

fn print_requests(
    requests: &[FriendshipRequest],
    format: &OutputFormat,
    empty: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if requests.is_empty() {
        println!("{}", empty);
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(requests)?);
        }
        OutputFormat::Text => {
            println!("{:<36}  {:<16}  {:<16}  CREATED", "ID", "FROM", "TO");
            println!("{}", "-".repeat(90));
            for request in requests {
                println!(
                    "{:<36}  {:<16}  {:<16}  {}",
                    request.id,
                    request.requester_name,
                    request.receiver_id,
                    request.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(())
}
