use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::{config::Config, model::employee::EmployeeRecord, roster::normalize::normalize};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("roster endpoint answered {0}")]
    Status(reqwest::StatusCode),

    #[error("roster body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ResponseError for RosterError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": "Failed to fetch employee roster"
        }))
    }
}

#[derive(Serialize)]
struct RosterCredentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Fetches the employee roster from the upstream source.
///
/// One POST per call: no caching, no retry.
#[derive(Clone)]
pub struct RosterClient {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl RosterClient {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RosterError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            username: username.into(),
            password: password.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RosterError> {
        Self::new(
            config.roster_url.clone(),
            config.roster_username.clone(),
            config.roster_password.clone(),
            Duration::from_secs(config.roster_timeout_secs),
        )
    }

    #[instrument(name = "roster_fetch", skip(self), fields(url = %self.url))]
    pub async fn fetch_employees(&self) -> Result<Vec<EmployeeRecord>, RosterError> {
        let raw = self.fetch_raw().await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch employees");
        })?;

        let records = normalize(raw);
        info!(count = records.len(), "Roster fetched");
        Ok(records)
    }

    async fn fetch_raw(&self) -> Result<Value, RosterError> {
        let response = self
            .client
            .post(&self.url)
            .json(&RosterCredentials {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Roster endpoint responded");
        if !status.is_success() {
            return Err(RosterError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
