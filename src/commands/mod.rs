mod browse;
mod buy;
mod config;
pub mod interactive;
mod raffle;
mod tickets;
mod user;

pub use browse::{BrowseCommand, cmd_browse, parse_browse_command};
pub use buy::cmd_buy;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use raffle::{
    ListOptions, ShowOptions, cmd_create, cmd_ls, cmd_set_status, cmd_show, cmd_stats,
};
pub use tickets::cmd_tickets;
pub use user::{cmd_user_create, cmd_user_ls, cmd_user_show};

use std::io::IsTerminal;

use serde_json::Value;

use crate::api::HttpRaffleApi;
use crate::config::Config;
use crate::error::Result;

/// Output of a command in both machine and human form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when asked for it, text otherwise (falling back to JSON)
    pub fn print(self, json: bool) -> Result<()> {
        match (json, self.text) {
            (false, Some(text)) => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

/// Print a value as pretty JSON
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Whether stdout gets ANSI colors
pub(crate) fn color_enabled() -> bool {
    std::io::stdout().is_terminal()
}

/// Load configuration and build the API client from it
pub(crate) fn connect() -> Result<(Config, HttpRaffleApi)> {
    let config = Config::load()?;
    let api = HttpRaffleApi::from_config(&config)?;
    Ok((config, api))
}
