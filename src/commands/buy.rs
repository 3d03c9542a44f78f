use owo_colors::OwoColorize;
use serde_json::json;

use super::interactive::confirm;
use super::raffle::load_session;
use super::{CommandOutput, color_enabled, connect};
use crate::display::{format_money, render_purchase_modal};
use crate::error::{Result, RifaError};
use crate::grid::{GridAction, TicketFormatter, compute_grid_view_model};
use crate::session::{PurchaseSettings, RaffleSession};
use crate::types::Raffle;

/// Reject numbers that cannot be selected, and drop duplicates.
fn checked_numbers(raffle: &Raffle, numbers: &[usize]) -> Result<Vec<usize>> {
    if !raffle.status.accepts_purchases() {
        return Err(RifaError::RaffleNotActive(raffle.id.clone()));
    }

    let mut unique: Vec<usize> = Vec::with_capacity(numbers.len());
    for &number in numbers {
        if number >= raffle.ticket_count() {
            return Err(RifaError::InvalidTicketNumber(format!(
                "{number} (tickets run from 0 to {})",
                raffle.ticket_count().saturating_sub(1)
            )));
        }
        if raffle.is_sold(number) {
            return Err(RifaError::StaleSelection(vec![number]));
        }
        if !unique.contains(&number) {
            unique.push(number);
        }
    }
    Ok(unique)
}

/// Buy a list of ticket numbers
pub async fn cmd_buy(
    id: &str,
    numbers: &[usize],
    user: Option<&str>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let (config, api) = connect()?;
    let settings = PurchaseSettings {
        user_id: config.require_user_id(user)?,
        proof_url: config.purchase.proof_url.clone(),
        revalidate: config.purchase.revalidate,
    };

    let mut session = RaffleSession::new(api, id, config.zoom_override());
    load_session(&mut session).await?;

    let numbers = match session.grid() {
        Some(grid) => checked_numbers(&grid.raffle, numbers)?,
        None => return Err(RifaError::RaffleNotFound(id.to_string())),
    };
    for &number in &numbers {
        session.dispatch(GridAction::CellClicked(number));
    }
    session.dispatch(GridAction::OpenPurchaseModal);

    if !yes {
        if json {
            return Err(RifaError::Other(
                "refusing to buy without confirmation; pass --yes together with --json".to_string(),
            ));
        }
        if let Some(modal) = session.grid().map(compute_grid_view_model).and_then(|vm| vm.modal) {
            println!("{}", render_purchase_modal(&modal, color_enabled()));
        }
        let prompt = format!("Buy {} ticket(s)", numbers.len());
        if !confirm(&prompt)? {
            println!("{}", "Aborted".dimmed());
            return Ok(());
        }
    }

    let ticket_count = session.grid().map(|g| g.raffle.ticket_count()).unwrap_or(0);
    let price = session.grid().map(|g| g.raffle.ticket_price).unwrap_or(0.0);
    let tickets = session.purchase(&settings).await?;

    let formatter = TicketFormatter::new(ticket_count);
    let labels: Vec<String> = numbers.iter().map(|n| formatter.format(*n)).collect();
    let text = format!(
        "Bought {} ticket(s) in {}: {} ({})",
        tickets.len(),
        id.cyan(),
        labels.join(", ").green(),
        format_money(price * tickets.len() as f64),
    );
    CommandOutput::new(json!({
        "raffle_id": id,
        "user_id": settings.user_id,
        "numbers": numbers,
        "tickets": tickets,
        "success": true,
    }))
    .with_text(text)
    .print(json)
}
