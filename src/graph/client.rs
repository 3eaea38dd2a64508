//! Microsoft Graph API HTTP client with OData pagination.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::graph::auth::TokenCache;

/// `OData` error response from Microsoft Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

/// Response wrapper for paginated Graph API responses.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client.
///
/// Single-shot requests only: each failure surfaces immediately as an error
/// rather than retrying, and the per-record policy is left to the pipeline.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    token_cache: TokenCache,
    graph_endpoint: String,
    api_version: String,
}

impl GraphClient {
    /// Creates a new Graph client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        token_cache: TokenCache,
        graph_endpoint: String,
        api_version: String,
    ) -> ReportResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_cache,
            graph_endpoint,
            api_version,
        })
    }

    /// Returns the base URL for Graph API requests.
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.graph_endpoint, self.api_version)
    }

    /// Performs a GET request with automatic token injection.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> ReportResult<T> {
        let token = self.token_cache.get_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(ReportError::from);
        }

        let error_body = response.text().await.unwrap_or_default();
        if let Ok(odata_error) = serde_json::from_str::<ODataError>(&error_body) {
            return Err(ReportError::GraphApi {
                code: odata_error.error.code,
                message: odata_error.error.message,
            });
        }

        Err(ReportError::GraphApi {
            code: status.to_string(),
            message: error_body,
        })
    }

    /// Fetches all pages of a paginated response into one vector, following
    /// `@odata.nextLink` until exhausted.
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        initial_url: &str,
    ) -> ReportResult<Vec<T>> {
        let mut url = initial_url.to_string();
        let mut items = Vec::new();

        loop {
            debug!(%url, "Fetching page");
            let response: ODataResponse<T> = self.get(&url).await?;
            items.extend(response.value);

            match response.next_link {
                Some(next) => url = next,
                None => return Ok(items),
            }
        }
    }
}
