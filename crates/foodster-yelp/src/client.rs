//! HTTP client for the Yelp Fusion business endpoints.
//!
//! Wraps `reqwest` with bearer-token authentication, a fixed request timeout
//! and typed decoding of the search envelope and single-business payloads.
//! Failures are never retried; a timeout surfaces like any other transport
//! error.

use std::time::Duration;

use foodster_core::{Restaurant, SearchEnvelope, SearchRequest};
use reqwest::{header, Client, Url};

use crate::error::{FetchCause, YelpError};

const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3/businesses";

/// Per-request timeout applied to every call.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Longest slice of an error body kept in [`FetchCause::Status`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the Yelp business search and detail endpoints.
///
/// Use [`YelpClient::new`] for production or [`YelpClient::with_base_url`]
/// to point at a mock server in tests.
pub struct YelpClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for YelpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YelpClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl YelpClient {
    /// Creates a client pointed at the production Yelp API.
    ///
    /// # Errors
    ///
    /// Returns [`YelpError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str) -> Result<Self, YelpError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom endpoint root (for testing with wiremock).
    ///
    /// `base_url` is the `businesses` collection: search requests go to
    /// `{base_url}/search` and detail requests to `{base_url}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`YelpError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YelpError::InvalidBaseUrl`] if `base_url`
    /// cannot carry path segments.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, YelpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("foodster/0.1 (restaurant-discovery)")
            .build()
            .map_err(YelpError::Client)?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| YelpError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(YelpError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry path segments".to_string(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Runs one business search and returns the `businesses` list.
    ///
    /// # Errors
    ///
    /// - [`YelpError::SearchFailed`] on transport failure or a non-2xx status.
    /// - [`YelpError::DecodeFailed`] if the body is not a search envelope.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Restaurant>, YelpError> {
        Ok(self.search_envelope(request).await?.businesses)
    }

    /// Runs one business search and returns the whole envelope, including
    /// `total` and `region` when the API supplies them.
    ///
    /// # Errors
    ///
    /// Same as [`YelpClient::search`].
    pub async fn search_envelope(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchEnvelope, YelpError> {
        let url = self.search_url(request)?;
        tracing::debug!(
            location = %request.location,
            sort_by = %request.sort,
            limit = request.limit,
            attributes = request.attributes.as_deref().unwrap_or(""),
            "searching businesses"
        );

        let body = self.get_text(url).await.map_err(YelpError::SearchFailed)?;
        let envelope: SearchEnvelope =
            serde_json::from_str(&body).map_err(|e| YelpError::DecodeFailed {
                context: "businesses/search".to_string(),
                source: e,
            })?;

        tracing::debug!(
            returned = envelope.businesses.len(),
            total = envelope.total,
            "business search complete"
        );
        Ok(envelope)
    }

    /// Fetches a single business by its Yelp id.
    ///
    /// # Errors
    ///
    /// - [`YelpError::DetailFetchFailed`] on transport failure or a non-2xx status.
    /// - [`YelpError::DecodeFailed`] if the body is not a business object.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Restaurant, YelpError> {
        let url = self.detail_url(id)?;
        tracing::debug!(id, "fetching business detail");

        let body = self
            .get_text(url)
            .await
            .map_err(|cause| YelpError::DetailFetchFailed {
                id: id.to_string(),
                cause,
            })?;

        serde_json::from_str(&body).map_err(|e| YelpError::DecodeFailed {
            context: format!("businesses/{id}"),
            source: e,
        })
    }

    /// Builds `{base}/search?...` with percent-encoded query parameters.
    fn search_url(&self, request: &SearchRequest) -> Result<Url, YelpError> {
        let mut url = self.url_with_segment("search")?;
        url.query_pairs_mut()
            .extend_pairs(request.query_pairs().iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// Builds `{base}/{id}`; the id is encoded as a single path segment.
    fn detail_url(&self, id: &str) -> Result<Url, YelpError> {
        self.url_with_segment(id)
    }

    fn url_with_segment(&self, segment: &str) -> Result<Url, YelpError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| YelpError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Sends an authenticated GET and returns the body of a 2xx response.
    async fn get_text(&self, url: Url) -> Result<String, FetchCause> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchCause::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
