//! Raffle API client.
//!
//! The backend is an external REST service. Everything that talks to it goes
//! through the [`RaffleApi`] trait so a handle can be injected wherever it is
//! needed and swapped for an in-memory fake in tests.

pub mod http;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, RifaError};
use crate::types::{
    BuyTicketData, CreateRaffleData, CreateUserData, Raffle, RaffleStatus, Ticket, User,
};

pub use http::HttpRaffleApi;

/// Operations offered by the raffle backend
pub trait RaffleApi: Send + Sync {
    /// `GET /raffles`
    fn list_raffles(&self) -> impl std::future::Future<Output = Result<Vec<Raffle>>> + Send;

    /// `GET /raffles/{id}`
    fn get_raffle(&self, id: &str) -> impl std::future::Future<Output = Result<Raffle>> + Send;

    /// `POST /raffles`
    fn create_raffle(
        &self,
        data: &CreateRaffleData,
    ) -> impl std::future::Future<Output = Result<Raffle>> + Send;

    /// `PATCH /raffles/{id}/status`
    fn update_raffle_status(
        &self,
        id: &str,
        status: RaffleStatus,
    ) -> impl std::future::Future<Output = Result<Raffle>> + Send;

    /// `POST /tickets/buy`, one ticket per call
    fn buy_ticket(
        &self,
        data: &BuyTicketData,
    ) -> impl std::future::Future<Output = Result<Ticket>> + Send;

    /// `GET /tickets/user?userId=`
    fn user_tickets(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Ticket>>> + Send;

    /// `GET /users`
    fn list_users(&self) -> impl std::future::Future<Output = Result<Vec<User>>> + Send;

    /// `GET /users/{id}`
    fn get_user(&self, id: &str) -> impl std::future::Future<Output = Result<User>> + Send;

    /// `POST /users`
    fn create_user(
        &self,
        data: &CreateUserData,
    ) -> impl std::future::Future<Output = Result<User>> + Send;
}

/// Decode a response body that is either the entity itself or an
/// `{data, message, success}` envelope around it.
///
/// An envelope with `success: false` is reported as an API error carrying
/// its message.
pub fn unwrap_envelope<T: DeserializeOwned>(status: u16, body: Value) -> Result<T> {
    let body = match body {
        Value::Object(mut map)
            if map.contains_key("data")
                && (map.contains_key("success") || map.contains_key("message")) =>
        {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request was not successful")
                    .to_string();
                return Err(RifaError::Api { status, message });
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(body)?)
}

/// Best-effort human message from an error response body.
///
/// Understands `{"message": "..."}`, `{"message": ["...", "..."]}` and
/// `{"error": "..."}`; anything else is returned as trimmed text.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        match map.get("message") {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Array(items)) if !items.is_empty() => {
                return items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join("; ");
            }
            _ => {}
        }
        if let Some(Value::String(s)) = map.get("error") {
            return s.clone();
        }
    }
    let text = body.trim();
    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text.to_string()
    }
}
