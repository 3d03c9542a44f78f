//! reqwest implementation of [`RaffleApi`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{RaffleApi, error_message, unwrap_envelope};
use crate::config::Config;
use crate::error::{Result, RifaError};
use crate::types::{
    BuyTicketData, CreateRaffleData, CreateUserData, Raffle, RaffleStatus, Ticket,
    UpdateRaffleStatusData, User,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raffle backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpRaffleApi {
    client: Client,
    base_url: Url,
}

impl HttpRaffleApi {
    /// Create a client from configuration
    ///
    /// Uses the configured request timeout and a 10s connect timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base_url(),
            Duration::from_secs(config.api.timeout),
        )
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(RifaError::Config(format!(
                "api.base_url '{base_url}' cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, escaping each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &text);
            warn!(%method, %url, status = status.as_u16(), %message, "request failed");
            return Err(RifaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(%method, %url, status = status.as_u16(), bytes = text.len(), "response received");
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        unwrap_envelope(status.as_u16(), body)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.execute(self.client.get(url)).await
    }

    async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.client.request(method, url).json(body)).await
    }
}

/// Turn a 404 into the matching not-found error.
fn not_found_as<T>(result: Result<T>, not_found: impl FnOnce() -> RifaError) -> Result<T> {
    match result {
        Err(RifaError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
            Err(not_found())
        }
        other => other,
    }
}

impl RaffleApi for HttpRaffleApi {
    async fn list_raffles(&self) -> Result<Vec<Raffle>> {
        self.get(self.endpoint(&["raffles"])).await
    }

    async fn get_raffle(&self, id: &str) -> Result<Raffle> {
        let result = self.get(self.endpoint(&["raffles", id])).await;
        not_found_as(result, || RifaError::RaffleNotFound(id.to_string()))
    }

    async fn create_raffle(&self, data: &CreateRaffleData) -> Result<Raffle> {
        self.send_json(Method::POST, self.endpoint(&["raffles"]), data)
            .await
    }

    async fn update_raffle_status(&self, id: &str, status: RaffleStatus) -> Result<Raffle> {
        let url = self.endpoint(&["raffles", id, "status"]);
        let result = self
            .send_json(Method::PATCH, url, &UpdateRaffleStatusData { status })
            .await;
        not_found_as(result, || RifaError::RaffleNotFound(id.to_string()))
    }

    async fn buy_ticket(&self, data: &BuyTicketData) -> Result<Ticket> {
        self.send_json(Method::POST, self.endpoint(&["tickets", "buy"]), data)
            .await
    }

    async fn user_tickets(&self, user_id: &str) -> Result<Vec<Ticket>> {
        let mut url = self.endpoint(&["tickets", "user"]);
        url.query_pairs_mut().append_pair("userId", user_id);
        self.get(url).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get(self.endpoint(&["users"])).await
    }

    async fn get_user(&self, id: &str) -> Result<User> {
        let result = self.get(self.endpoint(&["users", id])).await;
        not_found_as(result, || RifaError::UserNotFound(id.to_string()))
    }

    async fn create_user(&self, data: &CreateUserData) -> Result<User> {
        self.send_json(Method::POST, self.endpoint(&["users"]), data)
            .await
    }
}
