//! Client for the hosted quote store.
//!
//! The store exposes the `quotes` table through a PostgREST endpoint at
//! `{url}/rest/v1/quotes`. Every request carries the anon key both as the
//! `apikey` header and as a bearer token.

use super::config::{ConfigError, StoreConfig};
use crate::application::{QuoteSubmitter, SubmissionError};
use crate::domain::{QuoteRecord, StoredQuote};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Asks PostgREST to answer with a single object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{}", .message.as_deref().unwrap_or("quote store rejected the request"))]
    Rejected { status: u16, message: Option<String> },
    #[error("unexpected response from quote store: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl From<StoreError> for SubmissionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Rejected { message: Some(message), .. } => SubmissionError::new(message),
            StoreError::Rejected { message: None, .. } => SubmissionError::without_message(),
            StoreError::Http(e) if e.is_timeout() => SubmissionError::new("Network timeout"),
            StoreError::Http(e) if e.is_connect() => {
                SubmissionError::new("Could not reach the quote service")
            }
            other => SubmissionError::new(other.to_string()),
        }
    }
}

/// REST client for the `quotes` table.
#[derive(Clone)]
pub struct RestQuoteStore {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for RestQuoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestQuoteStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestQuoteStore {
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        let (url, key) = config.credentials()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: key.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/quotes", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Inserts one quote and returns the created row.
    ///
    /// Once the store has accepted the write the insert counts as done: a
    /// body that cannot be read yields an empty row rather than an error.
    pub async fn insert_quote(&self, record: &QuoteRecord) -> Result<StoredQuote, StoreError> {
        let response = self
            .authorized(self.http.post(self.table_url()))
            .header("Prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(&[record])
            .send()
            .await?;
        let response = Self::accepted(response).await?;

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "quote stored but the response body was lost");
                return Ok(StoredQuote::default());
            }
        };
        match StoredQuote::from_response_body(&body) {
            Ok(stored) => Ok(stored),
            Err(e) => {
                warn!(error = %e, "quote stored but the response could not be read");
                Ok(StoredQuote::default())
            }
        }
    }

    /// Lists all quotes, newest first.
    pub async fn list_quotes(&self) -> Result<Vec<StoredQuote>, StoreError> {
        let response = self
            .authorized(self.http.get(self.table_url()))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Sets the status of the quote with `id` and returns the updated row.
    pub async fn update_quote_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<StoredQuote, StoreError> {
        let filter = format!("eq.{}", id);
        let response = self
            .authorized(self.http.patch(self.table_url()))
            .query(&[("id", filter.as_str())])
            .header("Prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let body = Self::accepted(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Passes a 2xx response through; anything else becomes
    /// [`StoreError::Rejected`] carrying the store's message.
    async fn accepted(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
        if let Some(parsed) = &parsed {
            debug!(
                status = status.as_u16(),
                code = parsed.code.as_deref().unwrap_or("-"),
                hint = parsed.hint.as_deref().unwrap_or("-"),
                "quote store rejected request"
            );
        }
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message: parsed
                .and_then(|p| p.message)
                .filter(|m| !m.trim().is_empty()),
        })
    }
}

#[async_trait]
impl QuoteSubmitter for RestQuoteStore {
    async fn submit_quote(&self, record: &QuoteRecord) -> Result<StoredQuote, SubmissionError> {
        self.insert_quote(record).await.map_err(SubmissionError::from)
    }
}

/// Takes the store's place when no credentials are configured.
///
/// The form stays usable; every submission fails with the configuration
/// problem as its message.
#[derive(Debug)]
pub struct UnconfiguredStore {
    reason: String,
}

impl UnconfiguredStore {
    pub fn new(error: &ConfigError) -> Self {
        Self {
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl QuoteSubmitter for UnconfiguredStore {
    async fn submit_quote(&self, _record: &QuoteRecord) -> Result<StoredQuote, SubmissionError> {
        Err(SubmissionError::new(self.reason.clone()))
    }
}
