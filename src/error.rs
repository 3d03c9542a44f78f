use thiserror::Error;

#[derive(Error, Debug)]
pub enum RifaError {
    #[error("raffle '{0}' not found")]
    RaffleNotFound(String),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("invalid ticket number '{0}'")]
    InvalidTicketNumber(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid raffle type '{0}'")]
    InvalidRaffleType(String),

    #[error("invalid draw mode '{0}'")]
    InvalidDrawMode(String),

    #[error("raffle '{0}' is not active")]
    RaffleNotActive(String),

    #[error("no tickets selected")]
    EmptySelection,

    #[error("selection is stale, already sold: {}", format_numbers(.0))]
    StaleSelection(Vec<usize>),

    #[error(
        "purchase of ticket {failed} aborted: {message} (already bought: {})",
        format_numbers(.purchased)
    )]
    PurchaseAborted {
        purchased: Vec<usize>,
        failed: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

fn format_numbers(numbers: &[usize]) -> String {
    if numbers.is_empty() {
        return "none".to_string();
    }
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, RifaError>;
