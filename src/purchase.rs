//! Purchase submission.
//!
//! A selection is bought one ticket at a time, in selection order. Each call
//! completes before the next one starts. The first failure stops the batch;
//! tickets bought before it stay bought.

use tracing::{error, info, warn};

use crate::api::RaffleApi;
use crate::error::{Result, RifaError};
use crate::grid::SelectionSet;
use crate::types::{BuyTicketData, Ticket};

/// Everything needed to submit one selection
#[derive(Debug, Clone)]
pub struct PurchaseRequest<'a> {
    pub raffle_id: &'a str,
    pub user_id: &'a str,
    pub proof_url: &'a str,
    /// Fetch the raffle and check the selection before buying anything
    pub revalidate: bool,
}

/// Submit every selected number sequentially.
///
/// Returns the purchased tickets in selection order. An empty selection
/// submits nothing. The selection itself is never modified here; clearing
/// it on success is up to the caller.
pub async fn submit_selection<A: RaffleApi>(
    api: &A,
    request: &PurchaseRequest<'_>,
    selection: &SelectionSet,
) -> Result<Vec<Ticket>> {
    if selection.is_empty() {
        return Ok(Vec::new());
    }

    if request.revalidate {
        revalidate(api, request.raffle_id, selection).await?;
    }

    let mut purchased: Vec<Ticket> = Vec::with_capacity(selection.len());
    let mut bought: Vec<usize> = Vec::with_capacity(selection.len());
    for &number in selection.numbers() {
        let data = BuyTicketData {
            raffle_id: request.raffle_id.to_string(),
            user_id: request.user_id.to_string(),
            number,
            url_comprobante: request.proof_url.to_string(),
        };

        match api.buy_ticket(&data).await {
            Ok(ticket) => {
                info!(raffle_id = request.raffle_id, number, "ticket purchased");
                purchased.push(ticket);
                bought.push(number);
            }
            Err(e) => {
                error!(
                    raffle_id = request.raffle_id,
                    number,
                    already_bought = ?bought,
                    "ticket purchase failed: {e}"
                );
                return Err(RifaError::PurchaseAborted {
                    purchased: bought,
                    failed: number,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(purchased)
}

async fn revalidate<A: RaffleApi>(api: &A, raffle_id: &str, selection: &SelectionSet) -> Result<()> {
    let raffle = api.get_raffle(raffle_id).await?;
    if !raffle.status.accepts_purchases() {
        warn!(raffle_id, status = %raffle.status, "raffle stopped accepting purchases");
        return Err(RifaError::RaffleNotActive(raffle_id.to_string()));
    }

    let stale: Vec<usize> = selection
        .numbers()
        .iter()
        .copied()
        .filter(|n| *n >= raffle.ticket_count() || raffle.is_sold(*n))
        .collect();
    if !stale.is_empty() {
        warn!(raffle_id, ?stale, "selection contains sold tickets");
        return Err(RifaError::StaleSelection(stale));
    }
    Ok(())
}
