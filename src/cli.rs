use clap::{Parser, Subcommand};

use crate::catalog::{HomeFilter, SortBy};
use crate::config::VALID_KEYS;
use crate::grid::ZoomLevel;
use crate::types::{DrawMode, RaffleStatus, RaffleType, VALID_STATUSES, VALID_TYPES};

#[derive(Parser)]
#[command(name = "rifa")]
#[command(about = "Browse raffles and buy numbered tickets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List raffles
    #[command(visible_alias = "l")]
    Ls {
        /// Only raffles of this size: small, medium, large
        #[arg(short = 't', long = "type", value_parser = parse_type)]
        raffle_type: Option<RaffleType>,

        /// Only raffles with this status
        #[arg(short, long, value_parser = parse_status)]
        status: Option<RaffleStatus>,

        /// Only raffles drawn this way: app_draw, colombian_lottery
        #[arg(long, value_parser = parse_draw_mode)]
        draw_mode: Option<DrawMode>,

        /// Case-insensitive text search over title and description
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Sort order: newest, prize, tickets
        #[arg(long, default_value = "newest", value_parser = parse_sort)]
        sort: SortBy,

        /// Landing page view instead of the catalog: all, active, featured
        #[arg(long, value_parser = parse_home_filter, conflicts_with_all = ["raffle_type", "status", "draw_mode", "sort"])]
        home: Option<HomeFilter>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Totals over the active raffles
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render one page of a raffle's ticket grid
    #[command(visible_alias = "s")]
    Show {
        /// Raffle ID
        #[arg(value_parser = parse_raffle_id)]
        id: String,

        /// Zoom level 1-5 (default: by raffle size)
        #[arg(short, long, value_parser = parse_zoom)]
        zoom: Option<ZoomLevel>,

        /// Jump to the row holding this ticket number
        #[arg(short, long)]
        find: Option<String>,

        /// Columns to page forward from the start (or from --find)
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Buy ticket numbers in a raffle
    Buy {
        /// Raffle ID
        #[arg(value_parser = parse_raffle_id)]
        id: String,

        /// Ticket numbers, bought in the given order
        #[arg(required = true, num_args = 1..)]
        numbers: Vec<usize>,

        /// Buying user (default: user.id from config or RIFA_USER_ID)
        #[arg(short, long)]
        user: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse a raffle's grid interactively, one command per line
    #[command(visible_alias = "b")]
    Browse {
        /// Raffle ID
        #[arg(value_parser = parse_raffle_id)]
        id: String,

        /// Zoom level 1-5 (default: by raffle size)
        #[arg(short, long, value_parser = parse_zoom)]
        zoom: Option<ZoomLevel>,

        /// Buying user (default: user.id from config or RIFA_USER_ID)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List tickets bought by a user
    Tickets {
        /// User ID (default: user.id from config or RIFA_USER_ID)
        #[arg(short, long)]
        user: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a raffle
    Create {
        /// Raffle description
        description: String,

        /// Price of one ticket
        #[arg(long, value_parser = parse_amount)]
        price: f64,

        /// Prize value
        #[arg(long, value_parser = parse_amount)]
        prize: f64,

        /// Creator user ID (default: user.id from config or RIFA_USER_ID)
        #[arg(long)]
        creator: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a raffle's status
    SetStatus {
        /// Raffle ID
        #[arg(value_parser = parse_raffle_id)]
        id: String,

        /// New status: draft, active, closed, cancelled, finished
        #[arg(value_parser = parse_status)]
        status: RaffleStatus,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List users
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one user
    Show {
        /// User ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a user
    Create {
        /// Full name
        name: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// Key in dot notation (e.g. api.base_url)
        #[arg(value_parser = parse_config_key)]
        key: String,

        /// Value to set
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a configuration value
    Get {
        /// Key in dot notation (e.g. user.id)
        #[arg(value_parser = parse_config_key)]
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::catalog::CatalogFilter;
        use crate::commands::{
            ListOptions, ShowOptions, cmd_browse, cmd_buy, cmd_config_get, cmd_config_set,
            cmd_config_show, cmd_create, cmd_ls, cmd_set_status, cmd_show, cmd_stats, cmd_tickets,
            cmd_user_create, cmd_user_ls, cmd_user_show,
        };

        match self {
            Commands::Ls {
                raffle_type,
                status,
                draw_mode,
                search,
                sort,
                home,
                json,
            } => {
                cmd_ls(
                    ListOptions {
                        filter: CatalogFilter {
                            raffle_type,
                            status,
                            draw_mode,
                            search,
                        },
                        sort,
                        home,
                    },
                    json,
                )
                .await
            }
            Commands::Stats { json } => cmd_stats(json).await,
            Commands::Show {
                id,
                zoom,
                find,
                page,
                json,
            } => {
                cmd_show(
                    &id,
                    ShowOptions { zoom, find, page },
                    json,
                )
                .await
            }
            Commands::Buy {
                id,
                numbers,
                user,
                yes,
                json,
            } => cmd_buy(&id, &numbers, user.as_deref(), yes, json).await,
            Commands::Browse { id, zoom, user } => cmd_browse(&id, zoom, user.as_deref()).await,
            Commands::Tickets { user, json } => cmd_tickets(user.as_deref(), json).await,
            Commands::Create {
                description,
                price,
                prize,
                creator,
                json,
            } => cmd_create(&description, price, prize, creator.as_deref(), json).await,
            Commands::SetStatus { id, status, json } => cmd_set_status(&id, status, json).await,
            Commands::User { action } => match action {
                UserAction::Ls { json } => cmd_user_ls(json).await,
                UserAction::Show { id, json } => cmd_user_show(&id, json).await,
                UserAction::Create {
                    name,
                    phone,
                    email,
                    json,
                } => cmd_user_create(name, phone, email, json).await,
            },
            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            },
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_status(s: &str) -> Result<RaffleStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

fn parse_type(s: &str) -> Result<RaffleType, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "type",
        VALID_TYPES,
    )
}

fn parse_draw_mode(s: &str) -> Result<DrawMode, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "draw mode",
        &["app_draw", "colombian_lottery"],
    )
}

fn parse_sort(s: &str) -> Result<SortBy, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort",
        &["newest", "prize", "tickets"],
    )
}

fn parse_home_filter(s: &str) -> Result<HomeFilter, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "filter",
        &["all", "active", "featured"],
    )
}

fn parse_zoom(s: &str) -> Result<ZoomLevel, String> {
    s.parse::<u8>()
        .ok()
        .and_then(ZoomLevel::new)
        .ok_or_else(|| {
            format!(
                "Invalid zoom '{s}'. Must be between {} and {}",
                ZoomLevel::MIN.get(),
                ZoomLevel::MAX.get()
            )
        })
}

fn parse_amount(s: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(format!("Invalid amount '{s}'. Must be a non-negative number")),
    }
}

fn parse_config_key(s: &str) -> Result<String, String> {
    if VALID_KEYS.contains(&s) {
        return Ok(s.to_string());
    }
    // Suggest dot notation for underscore typos (api_base_url -> api.base_url)
    if let Some(pos) = s.find('_') {
        let dotted = format!("{}.{}", &s[..pos], &s[pos + 1..]);
        if VALID_KEYS.contains(&dotted.as_str()) {
            return Err(format!("Invalid config key '{s}'. Use dot notation: '{dotted}'"));
        }
    }
    Err(format!(
        "Invalid config key '{s}'. Must be one of: {}",
        VALID_KEYS.join(", ")
    ))
}

fn parse_raffle_id(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("ID cannot be empty".to_string());
    }

    if s.chars().all(char::is_whitespace) {
        return Err("ID cannot be only whitespace".to_string());
    }

    Ok(s.trim().to_string())
}
