//! User commands: `user ls`, `user show`, `user create`.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, connect, print_json};
use crate::api::RaffleApi;
use crate::error::{Result, RifaError};
use crate::types::{CreateUserData, User};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            email: user.email.clone(),
        }
    }
}

fn user_text(user: &User) -> String {
    format!(
        "{} {}\n  Phone: {}\n  Email: {}",
        user.name.bold(),
        user.id.dimmed(),
        user.phone,
        user.email
    )
}

/// List users
pub async fn cmd_user_ls(json: bool) -> Result<()> {
    let (_, api) = connect()?;
    let users = api.list_users().await?;

    if json {
        return print_json(&serde_json::to_value(&users)?);
    }
    if users.is_empty() {
        println!("{}", "No users found".dimmed());
        return Ok(());
    }

    let mut table = Table::new(users.iter().map(UserRow::from));
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

/// Show one user
pub async fn cmd_user_show(id: &str, json: bool) -> Result<()> {
    let (_, api) = connect()?;
    let user = api.get_user(id).await?;
    CommandOutput::new(serde_json::to_value(&user)?)
        .with_text(user_text(&user))
        .print(json)
}

/// Register a user
pub async fn cmd_user_create(name: String, phone: String, email: String, json: bool) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RifaError::Other("user name cannot be empty".to_string()));
    }
    if !email.contains('@') {
        return Err(RifaError::Other(format!("'{email}' is not an email address")));
    }

    let (_, api) = connect()?;
    let user = api
        .create_user(&CreateUserData {
            name: name.trim().to_string(),
            phone,
            email,
        })
        .await?;

    let text = format!(
        "Created user {} {}\n{}",
        user.name.bold(),
        user.id.cyan(),
        format!("Use it for purchases: rifa config set user.id {}", user.id).dimmed()
    );
    CommandOutput::new(json!({
        "user": user,
        "success": true,
    }))
    .with_text(text)
    .print(json)
}
