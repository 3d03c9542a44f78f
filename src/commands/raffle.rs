//! Raffle commands: `ls`, `stats`, `show`, `create`, `set-status`.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, color_enabled, connect, print_json};
use crate::api::RaffleApi;
use crate::catalog::{
    CatalogFilter, HomeFilter, SortBy, compute_stats, draw_mode_label, filter_and_sort,
    filter_home, progress_percent, status_label, type_label,
};
use crate::display::{format_count, format_money, format_status_colored, progress_bar, render_grid};
use crate::error::{Result, RifaError};
use crate::grid::{
    GridAction, GridState, SearchOutcome, ZoomLevel, compute_grid_view_model, zoom_reaching,
};
use crate::session::{RaffleSession, SessionState};
use crate::types::{CreateRaffleData, Raffle, RaffleStatus};

/// Options for `rifa ls`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: CatalogFilter,
    pub sort: SortBy,
    /// Landing page view; replaces the catalog filters and sort
    pub home: Option<HomeFilter>,
}

/// A row in the raffle list table
#[derive(Tabled)]
struct RaffleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Raffle")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Prize")]
    prize: String,
    #[tabled(rename = "Sold")]
    sold: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

fn raffle_json(raffle: &Raffle) -> serde_json::Value {
    json!({
        "id": raffle.id,
        "title": raffle.title,
        "description": raffle.description,
        "status": raffle.status.to_string(),
        "raffle_type": raffle.raffle_type.to_string(),
        "draw_mode": raffle.draw_mode.to_string(),
        "featured": raffle.featured,
        "ticket_price": raffle.ticket_price,
        "prize_value": raffle.prize_value,
        "second_prize_value": raffle.second_prize_value,
        "ticket_count": raffle.ticket_count(),
        "sold": raffle.sold_count(),
        "available": raffle.available_count(),
        "progress": progress_percent(raffle),
        "created_at": raffle.created_at,
    })
}

/// List raffles from the catalog
pub async fn cmd_ls(options: ListOptions, json: bool) -> Result<()> {
    let (_, api) = connect()?;
    let raffles = api.list_raffles().await?;

    let shown = match options.home {
        Some(home) => filter_home(&raffles, home, options.filter.search.as_deref()),
        None => filter_and_sort(&raffles, &options.filter, options.sort),
    };

    if json {
        let items: Vec<_> = shown.iter().map(|r| raffle_json(r)).collect();
        return print_json(&json!(items));
    }

    if shown.is_empty() {
        println!("{}", "No raffles found".dimmed());
        return Ok(());
    }

    let rows: Vec<RaffleRow> = shown
        .iter()
        .map(|r| {
            let progress = progress_percent(r);
            RaffleRow {
                id: r.id.clone(),
                name: r.display_name().to_string(),
                status: status_label(r.status).to_string(),
                size: type_label(r.raffle_type).to_string(),
                price: format_money(r.ticket_price),
                prize: format_money(r.prize_value),
                sold: format!(
                    "{}/{}",
                    format_count(r.sold_count()),
                    format_count(r.ticket_count())
                ),
                progress: format!("{} {:>3.0}%", progress_bar(progress, 10), progress),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{}",
        format!("Showing {} of {} raffles", shown.len(), raffles.len()).dimmed()
    );
    Ok(())
}

/// Totals over the active raffles
pub async fn cmd_stats(json: bool) -> Result<()> {
    let (_, api) = connect()?;
    let raffles = api.list_raffles().await?;
    let stats = compute_stats(&raffles);

    let text = format!(
        "{}\n  Active raffles: {}\n  Prizes:         {}\n  Tickets sold:   {} / {}",
        "Raffle stats".cyan().bold(),
        stats.active_raffles,
        format_money(stats.total_prize_value),
        format_count(stats.sold_tickets),
        format_count(stats.total_tickets),
    );
    CommandOutput::new(serde_json::to_value(&stats)?)
        .with_text(text)
        .print(json)
}

/// Options for `rifa show`
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub zoom: Option<ZoomLevel>,
    pub find: Option<String>,
    pub page: usize,
}

fn raffle_header(raffle: &Raffle) -> String {
    let mut lines = vec![format!(
        "{} {} {}",
        raffle.display_name().bold(),
        format_status_colored(raffle.status),
        raffle.id.dimmed()
    )];
    let mut prize = format!("Prize: {}", format_money(raffle.prize_value));
    if let Some(second) = raffle.second_prize_value {
        prize.push_str(&format!(" (second prize {})", format_money(second)));
    }
    lines.push(format!(
        "Ticket: {} | {} | {} | {}",
        format_money(raffle.ticket_price),
        prize,
        type_label(raffle.raffle_type),
        draw_mode_label(raffle.draw_mode),
    ));
    lines.join("\n")
}

/// Feedback for a search that did not bring its ticket into view.
pub(super) fn search_message(outcome: SearchOutcome, query: &str, grid: &GridState) -> Option<String> {
    let ticket_count = grid.raffle.ticket_count();
    match outcome {
        SearchOutcome::Found { .. } | SearchOutcome::Empty => None,
        SearchOutcome::NotANumber => Some(format!("'{query}' is not a ticket number")),
        SearchOutcome::OutOfRange => Some(format!(
            "Ticket {} does not exist (tickets 0-{})",
            query.trim(),
            ticket_count.saturating_sub(1)
        )),
        SearchOutcome::OutOfView { number, .. } => {
            let zoom = grid.viewport.zoom();
            Some(match zoom_reaching(ticket_count, number, zoom) {
                Some(level) => format!(
                    "Ticket {number} cannot be shown at zoom {}; it is visible at zoom {}",
                    zoom.get(),
                    level.get()
                ),
                None => format!("Ticket {number} cannot be shown at any zoom level"),
            })
        }
    }
}

/// Load a raffle through a session, turning a failed load into an error
pub(super) async fn load_session<A: RaffleApi>(
    session: &mut RaffleSession<A>,
) -> Result<()> {
    let id = session.raffle_id().to_string();
    match session.load().await {
        SessionState::Ready(_) => Ok(()),
        SessionState::Failed { message } => Err(RifaError::Other(format!(
            "failed to load raffle '{id}': {message}"
        ))),
        SessionState::Loading => Err(RifaError::Other(format!(
            "raffle '{id}' is still loading"
        ))),
    }
}

/// Column steps actually needed for `--page`, stopping at the last window.
fn page_steps(grid: &GridState, page: usize) -> usize {
    let viewport = &grid.viewport;
    let remaining =
        viewport.max_offset().saturating_sub(viewport.offset()) / viewport.cols().max(1);
    page.min(remaining)
}

/// Render one page of a raffle's grid
pub async fn cmd_show(id: &str, options: ShowOptions, json: bool) -> Result<()> {
    let (config, api) = connect()?;
    let mut session = RaffleSession::new(api, id, options.zoom.or(config.zoom_override()));
    load_session(&mut session).await?;

    if let Some(query) = &options.find {
        session.dispatch(GridAction::Search(query.clone()));
    }
    let steps = session
        .grid()
        .map_or(0, |grid| page_steps(grid, options.page));
    for _ in 0..steps {
        session.dispatch(GridAction::PageForward);
    }

    let grid = session
        .grid()
        .ok_or_else(|| RifaError::RaffleNotFound(id.to_string()))?;
    let vm = compute_grid_view_model(grid);

    if json {
        return print_json(&json!({
            "raffle": raffle_json(&grid.raffle),
            "grid": vm,
        }));
    }

    println!("{}", raffle_header(&grid.raffle));
    println!();
    println!("{}", render_grid(&vm, color_enabled()));
    if let (Some(query), Some(outcome)) = (&options.find, grid.last_search)
        && let Some(message) = search_message(outcome, query, grid)
    {
        eprintln!("{}", message.yellow());
    }
    Ok(())
}

/// Create a raffle
pub async fn cmd_create(
    description: &str,
    price: f64,
    prize: f64,
    creator: Option<&str>,
    json: bool,
) -> Result<()> {
    let (config, api) = connect()?;
    let creator_id = config.require_user_id(creator)?;
    let raffle = api
        .create_raffle(&CreateRaffleData {
            creator_id,
            description: description.to_string(),
            ticket_price: price,
            prize_value: prize,
        })
        .await?;

    let text = format!(
        "Created raffle {} {}",
        raffle.id.cyan(),
        format_status_colored(raffle.status)
    );
    CommandOutput::new(raffle_json(&raffle))
        .with_text(text)
        .print(json)
}

/// Change a raffle's status
pub async fn cmd_set_status(id: &str, status: RaffleStatus, json: bool) -> Result<()> {
    let (_, api) = connect()?;
    let raffle = api.update_raffle_status(id, status).await?;

    let text = format!(
        "Updated {} -> {}",
        raffle.id.cyan(),
        format_status_colored(raffle.status)
    );
    CommandOutput::new(json!({
        "id": raffle.id,
        "status": raffle.status.to_string(),
        "success": true,
    }))
    .with_text(text)
    .print(json)
}
