/**
 * Sample Data Client
 *
 * HTTP client for the demo endpoint that serves a canned list of household
 * items and echoes submitted item forms back. Used to seed a fresh list and
 * to check that a form survives the round trip to a server unchanged.
 */
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::shared::config::AppConfig;
use crate::shared::item::Item;
use crate::sync::forms::NewItemForm;

/// Path of the sample item collection on the server
pub const ITEMS_PATH: &str = "/api/items";

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Invalid sample URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sample endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

pub type Result<T> = std::result::Result<T, SampleError>;

/// Client for the sample-data endpoint
#[derive(Debug, Clone)]
pub struct SampleClient {
    client: Client,
    items_url: Url,
}

impl SampleClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| SampleError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let items_url = base
            .join(ITEMS_PATH)
            .map_err(|e| SampleError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            items_url,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.sample_url)
    }

    /// Fetch the canned item list via `GET /api/items`
    pub async fn fetch_items(&self) -> Result<Vec<Item>> {
        tracing::debug!("[Sample] GET {}", self.items_url);
        let response = self.client.get(self.items_url.clone()).send().await?;
        let response = Self::check(response).await?;
        let items: Vec<Item> = response.json().await?;
        tracing::info!("[Sample] Fetched {} sample items", items.len());
        Ok(items)
    }

    /// Submit a form via `POST /api/items` and return the echoed payload
    pub async fn echo(&self, form: &NewItemForm) -> Result<NewItemForm> {
        tracing::debug!("[Sample] POST {} ({})", self.items_url, form.title);
        let response = self
            .client
            .post(self.items_url.clone())
            .json(form)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|_| status.to_string());
        tracing::warn!("[Sample] Request failed: {} - {}", status, body);
        Err(SampleError::Status { status, body })
    }
}
