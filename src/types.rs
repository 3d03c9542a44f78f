use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RifaError;

/// Lifecycle state of a raffle as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RaffleStatus {
    #[default]
    Draft,
    Active,
    Closed,
    Cancelled,
    Finished,
    /// Any status string this client does not know about
    #[serde(other)]
    Unknown,
}

impl RaffleStatus {
    /// Only active raffles accept selections and purchases.
    pub fn accepts_purchases(self) -> bool {
        self == RaffleStatus::Active
    }

    /// Notice shown under the grid when tickets cannot be bought.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            RaffleStatus::Active => None,
            RaffleStatus::Draft => Some("This raffle is still a draft"),
            RaffleStatus::Closed => Some("This raffle is closed"),
            RaffleStatus::Cancelled => Some("This raffle has been cancelled"),
            RaffleStatus::Finished => Some("This raffle has finished"),
            RaffleStatus::Unknown => Some("This raffle is not available"),
        }
    }
}

impl fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleStatus::Draft => write!(f, "draft"),
            RaffleStatus::Active => write!(f, "active"),
            RaffleStatus::Closed => write!(f, "closed"),
            RaffleStatus::Cancelled => write!(f, "cancelled"),
            RaffleStatus::Finished => write!(f, "finished"),
            RaffleStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for RaffleStatus {
    type Err = RifaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(RaffleStatus::Draft),
            "active" => Ok(RaffleStatus::Active),
            "closed" => Ok(RaffleStatus::Closed),
            "cancelled" => Ok(RaffleStatus::Cancelled),
            "finished" => Ok(RaffleStatus::Finished),
            _ => Err(RifaError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_STATUSES: &[&str] = &["draft", "active", "closed", "cancelled", "finished"];

/// Raffle size class. Only informs the default grid density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RaffleType {
    Medium,
    Large,
    #[default]
    #[serde(other)]
    Small,
}

impl RaffleType {
    /// Nominal ticket count for this size class
    pub fn nominal_tickets(self) -> usize {
        match self {
            RaffleType::Small => 100,
            RaffleType::Medium => 1_000,
            RaffleType::Large => 10_000,
        }
    }
}

impl fmt::Display for RaffleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleType::Small => write!(f, "small"),
            RaffleType::Medium => write!(f, "medium"),
            RaffleType::Large => write!(f, "large"),
        }
    }
}

impl FromStr for RaffleType {
    type Err = RifaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "100" => Ok(RaffleType::Small),
            "medium" | "1000" | "1k" => Ok(RaffleType::Medium),
            "large" | "10000" | "10k" => Ok(RaffleType::Large),
            _ => Err(RifaError::InvalidRaffleType(s.to_string())),
        }
    }
}

pub const VALID_TYPES: &[&str] = &["small", "medium", "large"];

/// How the winning number is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    ColombianLottery,
    #[default]
    #[serde(other)]
    AppDraw,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawMode::AppDraw => write!(f, "app_draw"),
            DrawMode::ColombianLottery => write!(f, "colombian_lottery"),
        }
    }
}

impl FromStr for DrawMode {
    type Err = RifaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "app_draw" | "app" => Ok(DrawMode::AppDraw),
            "colombian_lottery" | "lottery" => Ok(DrawMode::ColombianLottery),
            _ => Err(RifaError::InvalidDrawMode(s.to_string())),
        }
    }
}

/// A raffle as served by `GET /raffles/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Raffle {
    pub id: String,

    #[serde(default)]
    pub creator_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(deserialize_with = "de_amount")]
    pub ticket_price: f64,

    #[serde(default, deserialize_with = "de_amount")]
    pub prize_value: f64,

    #[serde(
        default,
        deserialize_with = "de_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub second_prize_value: Option<f64>,

    /// Sold flag per ticket number; index is the ticket number
    #[serde(default)]
    pub tickets: Vec<bool>,

    #[serde(default)]
    pub status: RaffleStatus,

    #[serde(default)]
    pub raffle_type: RaffleType,

    #[serde(default)]
    pub draw_mode: DrawMode,

    #[serde(default)]
    pub featured: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Raffle {
    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_sold(&self, number: usize) -> bool {
        self.tickets.get(number).copied().unwrap_or(false)
    }

    pub fn sold_count(&self) -> usize {
        self.tickets.iter().filter(|sold| **sold).count()
    }

    pub fn available_count(&self) -> usize {
        self.ticket_count() - self.sold_count()
    }

    /// Title when present, description otherwise
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// A purchased ticket record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(default)]
    pub id: String,
    pub raffle_id: String,
    pub user_id: String,
    pub number: usize,
    #[serde(default)]
    pub url_comprobante: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyTicketData {
    pub raffle_id: String,
    pub user_id: String,
    pub number: usize,
    pub url_comprobante: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRaffleData {
    pub creator_id: String,
    pub description: String,
    pub ticket_price: f64,
    pub prize_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserData {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRaffleStatusData {
    pub status: RaffleStatus,
}

/// Amounts arrive either as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Amount::Number(n) => Ok(n),
            Amount::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid amount '{s}'"))),
        }
    }
}

fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Amount::deserialize(deserializer)?.into_f64()
}

fn de_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Amount>::deserialize(deserializer)?
        .map(Amount::into_f64)
        .transpose()
}
