//! Line-driven grid browser.
//!
//! Each input line is one command; the grid is redrawn after every command
//! that changes it.

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::interactive::is_yes;
use super::raffle::{load_session, search_message};
use super::{color_enabled, connect};
use crate::api::RaffleApi;
use crate::display::{render_grid, render_purchase_modal};
use crate::error::Result;
use crate::grid::{ArrowKey, GridAction, compute_grid_view_model};
use crate::session::{PurchaseSettings, RaffleSession, SessionState};

const HELP: &str = "\
Commands:
  n, >          next column        p, <        previous column
  +             zoom in            -           zoom out
  /N            jump to ticket N   /           clear search
  t N [N...]    toggle tickets     c           clear selection
  buy           buy the selection  r           reload the raffle
  h, ?          this help          q           quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    /// Actions applied to the grid in order
    Grid(Vec<GridAction>),
    Buy,
    Reload,
    Help,
    Quit,
}

/// Parse an input line into a browser command.
pub fn parse_browse_command(line: &str) -> std::result::Result<BrowseCommand, String> {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        let query = query.trim();
        let action = if query.is_empty() {
            GridAction::ClearSearch
        } else {
            GridAction::Search(query.to_string())
        };
        return Ok(BrowseCommand::Grid(vec![action]));
    }

    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command, type h for help".to_string());
    };
    let single = |action| Ok(BrowseCommand::Grid(vec![action]));

    match head.to_lowercase().as_str() {
        "n" | "next" | ">" => single(GridAction::Arrow(ArrowKey::Right)),
        "p" | "prev" | "<" => single(GridAction::Arrow(ArrowKey::Left)),
        "+" => single(GridAction::ZoomIn),
        "-" => single(GridAction::ZoomOut),
        "c" | "clear" => single(GridAction::ClearSelection),
        "f" | "find" => match words.next() {
            Some(query) => single(GridAction::Search(query.to_string())),
            None => single(GridAction::ClearSearch),
        },
        "t" | "toggle" => {
            let numbers = words
                .map(|w| {
                    w.parse::<usize>()
                        .map_err(|_| format!("'{w}' is not a ticket number"))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if numbers.is_empty() {
                return Err("usage: t N [N...]".to_string());
            }
            Ok(BrowseCommand::Grid(
                numbers.into_iter().map(GridAction::CellClicked).collect(),
            ))
        }
        "buy" => Ok(BrowseCommand::Buy),
        "r" | "reload" => Ok(BrowseCommand::Reload),
        "h" | "help" | "?" => Ok(BrowseCommand::Help),
        "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command '{other}', type h for help")),
    }
}

fn draw<A: RaffleApi>(session: &RaffleSession<A>) {
    match session.state() {
        SessionState::Ready(grid) => {
            let vm = compute_grid_view_model(grid);
            println!("{}", render_grid(&vm, color_enabled()));
        }
        SessionState::Failed { message } => {
            println!("{} {}", "Failed to load raffle:".red(), message);
            println!("{}", "Type r to retry".dimmed());
        }
        SessionState::Loading => println!("{}", "Loading...".dimmed()),
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    Ok(lines.next_line().await?)
}

async fn buy<A: RaffleApi>(
    session: &mut RaffleSession<A>,
    lines: &mut Lines<BufReader<Stdin>>,
    settings: Option<&PurchaseSettings>,
) -> Result<()> {
    let Some(settings) = settings else {
        println!(
            "{}",
            "No user configured. Restart with --user or run: rifa config set user.id <id>".yellow()
        );
        return Ok(());
    };

    session.dispatch(GridAction::OpenPurchaseModal);
    let Some(modal) = session
        .grid()
        .filter(|g| g.modal_open)
        .map(compute_grid_view_model)
        .and_then(|vm| vm.modal)
    else {
        println!("{}", "Select at least one ticket on an active raffle first".yellow());
        return Ok(());
    };

    println!("{}", render_purchase_modal(&modal, color_enabled()));
    println!("Confirm? [y/N]");
    let answer = read_line(lines).await?.unwrap_or_default();
    if !is_yes(&answer) {
        session.dispatch(GridAction::ClosePurchaseModal);
        return Ok(());
    }

    match session.purchase(settings).await {
        Ok(tickets) => println!("{}", format!("Bought {} ticket(s)", tickets.len()).green()),
        Err(e) => {
            println!("{} {}", "Purchase failed:".red(), e);
            println!("{}", "Selection kept; type r to reload the raffle".dimmed());
            session.dispatch(GridAction::ClosePurchaseModal);
        }
    }
    Ok(())
}

/// Browse a raffle interactively
pub async fn cmd_browse(
    id: &str,
    zoom: Option<crate::grid::ZoomLevel>,
    user: Option<&str>,
) -> Result<()> {
    let (config, api) = connect()?;
    let settings = config
        .require_user_id(user)
        .ok()
        .map(|user_id| PurchaseSettings {
            user_id,
            proof_url: config.purchase.proof_url.clone(),
            revalidate: config.purchase.revalidate,
        });

    let mut session = RaffleSession::new(api, id, zoom.or(config.zoom_override()));
    if let Err(e) = load_session(&mut session).await {
        eprintln!("{e}");
    }
    draw(&session);
    println!("{}", "Type h for help".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = read_line(&mut lines).await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_browse_command(&line) {
            Ok(BrowseCommand::Quit) => break,
            Ok(BrowseCommand::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(BrowseCommand::Reload) => {
                session.retry().await;
            }
            Ok(BrowseCommand::Buy) => {
                buy(&mut session, &mut lines, settings.as_ref()).await?;
            }
            Ok(BrowseCommand::Grid(actions)) => {
                let mut query = None;
                for action in actions {
                    if let GridAction::Search(text) = &action {
                        query = Some(text.clone());
                    }
                    session.dispatch(action);
                }
                draw(&session);
                if let Some(query) = query
                    && let Some(grid) = session.grid()
                    && let Some(outcome) = grid.last_search
                    && let Some(message) = search_message(outcome, &query, grid)
                {
                    println!("{}", message.yellow());
                }
                continue;
            }
            Err(message) => {
                println!("{}", message.yellow());
                continue;
            }
        }
        draw(&session);
    }
    Ok(())
}
