use jiff::Timestamp;
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{connect, print_json};
use crate::api::RaffleApi;
use crate::error::Result;
use crate::types::Ticket;

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "Raffle")]
    raffle: String,
    #[tabled(rename = "Number")]
    number: usize,
    #[tabled(rename = "Proof")]
    proof: String,
    #[tabled(rename = "Bought at")]
    bought_at: String,
}

/// Render an API timestamp as `YYYY-MM-DD HH:MM UTC`, or as-is when unparseable.
fn format_bought_at(raw: &str) -> String {
    match raw.parse::<Timestamp>() {
        Ok(ts) => ts.strftime("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) if raw.is_empty() => "-".to_string(),
        Err(_) => raw.to_string(),
    }
}

fn sorted(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| a.raffle_id.cmp(&b.raffle_id).then(a.number.cmp(&b.number)));
    tickets
}

/// List the tickets a user holds
pub async fn cmd_tickets(user: Option<&str>, json: bool) -> Result<()> {
    let (config, api) = connect()?;
    let user_id = config.require_user_id(user)?;
    let tickets = sorted(api.user_tickets(&user_id).await?);

    if json {
        return print_json(&json!({
            "user_id": user_id,
            "tickets": tickets,
        }));
    }

    if tickets.is_empty() {
        println!("{}", format!("No tickets for user {user_id}").dimmed());
        return Ok(());
    }

    let rows: Vec<TicketRow> = tickets
        .iter()
        .map(|t| TicketRow {
            raffle: t.raffle_id.clone(),
            number: t.number,
            proof: if t.url_comprobante.is_empty() {
                "-".to_string()
            } else {
                t.url_comprobante.clone()
            },
            bought_at: format_bought_at(&t.created_at),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("{}", format!("{} ticket(s)", tickets.len()).dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bought_at() {
        assert_eq!(
            format_bought_at("2026-03-01T14:05:09.123Z"),
            "2026-03-01 14:05 UTC"
        );
        assert_eq!(format_bought_at("yesterday"), "yesterday");
        assert_eq!(format_bought_at(""), "-");
    }

    #[test]
    fn test_sorted_groups_by_raffle() {
        let ticket = |raffle: &str, number| Ticket {
            raffle_id: raffle.to_string(),
            number,
            ..Default::default()
        };
        let order: Vec<_> = sorted(vec![ticket("b", 1), ticket("a", 9), ticket("a", 2)])
            .into_iter()
            .map(|t| (t.raffle_id, t.number))
            .collect();
        assert_eq!(
            order,
            vec![("a".to_string(), 2), ("a".to_string(), 9), ("b".to_string(), 1)]
        );
    }
}
