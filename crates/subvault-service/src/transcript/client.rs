//! Transcript provider HTTP client.

use reqwest::{Client, StatusCode};

use subvault_core::TranscriptQuery;

/// Header the provider reads the API key from.
const API_KEY_HEADER: &str = "x-api-key";

/// Error type for provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Diagnostic body text.
        body: String,
    },
}

/// Client for the transcript provider's `/v1/transcript` endpoint.
///
/// No request timeout is set and failed calls are never retried.
#[derive(Debug, Clone)]
pub struct TranscriptClient {
    client: Client,
    base_url: String,
}

impl TranscriptClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("subvault/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a transcript using `api_key`.
    ///
    /// The JSON body is returned untouched: a segment array, or a text object when
    /// `query.text` is set.
    pub async fn fetch(
        &self,
        query: &TranscriptQuery,
        api_key: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}/v1/transcript", self.base_url);

        let mut params = vec![("url", query.url.as_str()), ("lang", query.lang.as_str())];
        if query.text {
            params.push(("text", "true"));
        }

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}
