mod config_cmd;
mod friend;
mod shop;
mod user;

pub use config_cmd::ConfigCommand;
pub use friend::FriendCommand;
pub use shop::ShopCommand;
pub use user::UserCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
