//! Reqwest-backed places provider adapter.
//!
//! This adapter owns transport details only: endpoint and field-mask
//! construction, API key headers, HTTP error mapping, and JSON decoding
//! into the provider-neutral payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use super::dto::{PlaceDetailsDto, SearchRequestDto, SearchResponseDto};
use crate::domain::place::{PlaceId, SourcePlace};
use crate::domain::ports::{PlaceField, PlaceSource, PlaceSourceError};

/// Conventional base endpoint for place detail lookups.
///
/// Hosts parse this (or a proxy of their own) into the [`Url`] handed to
/// [`HttpPlaceSource::new`]. The search endpoint is derived from it.
pub const DEFAULT_PLACES_ENDPOINT: &str = "https://places.googleapis.com/v1/places/";

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Errors raised while constructing the adapter.
#[derive(Debug, Error)]
pub enum PlacesClientError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build places HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The search endpoint could not be derived from the base endpoint.
    #[error("failed to derive places search endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Places provider adapter speaking the provider's HTTP JSON shape.
pub struct HttpPlaceSource {
    client: Client,
    endpoint: Url,
    search_endpoint: Url,
    api_key: String,
}

impl HttpPlaceSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesClientError`] when the HTTP client cannot be
    /// constructed or the search endpoint cannot be derived.
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Result<Self, PlacesClientError> {
        Self::with_timeout(
            endpoint,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesClientError`] when the HTTP client cannot be
    /// constructed or the search endpoint cannot be derived.
    pub fn with_timeout(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlacesClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let search_endpoint = derive_search_endpoint(&endpoint)?;
        Ok(Self {
            client,
            endpoint,
            search_endpoint,
            api_key: api_key.into(),
        })
    }

    fn details_url(&self, id: &PlaceId) -> Result<Url, PlaceSourceError> {
        self.endpoint.join(id.as_ref()).map_err(|error| {
            PlaceSourceError::transport(format!("invalid place details URL: {error}"))
        })
    }
}

#[async_trait]
impl PlaceSource for HttpPlaceSource {
    async fn fetch_details(
        &self,
        id: &PlaceId,
        fields: &[PlaceField],
    ) -> Result<SourcePlace, PlaceSourceError> {
        let url = self.details_url(id)?;
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(FIELD_MASK_HEADER, details_mask(fields))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PlaceSourceError::not_found(id.as_ref()));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: PlaceDetailsDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            PlaceSourceError::transport(format!("invalid place details payload: {error}"))
        })?;
        Ok(decoded.into_source_place())
    }

    async fn search(
        &self,
        query: &str,
        fields: &[PlaceField],
    ) -> Result<Vec<SourcePlace>, PlaceSourceError> {
        let response = self
            .client
            .post(self.search_endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(FIELD_MASK_HEADER, search_mask(fields))
            .json(&SearchRequestDto { text_query: query })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: SearchResponseDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            PlaceSourceError::transport(format!("invalid place search payload: {error}"))
        })?;
        Ok(decoded
            .places
            .into_iter()
            .map(PlaceDetailsDto::into_source_place)
            .collect())
    }
}

/// The search endpoint replaces the trailing resource segment with the
/// provider's `:searchText` verb.
fn derive_search_endpoint(endpoint: &Url) -> Result<Url, url::ParseError> {
    let base = endpoint.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}:searchText"))
}

fn provider_field(field: PlaceField) -> &'static str {
    match field {
        PlaceField::DisplayName => "displayName",
        PlaceField::FormattedAddress => "formattedAddress",
        PlaceField::Location => "location",
        PlaceField::Rating => "rating",
        PlaceField::UserRatingCount => "userRatingCount",
        PlaceField::Photos => "photos",
    }
}

fn details_mask(fields: &[PlaceField]) -> String {
    fields
        .iter()
        .copied()
        .map(provider_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Search masks are nested under `places.` and always include the id so
/// candidates can be cached and selected.
fn search_mask(fields: &[PlaceField]) -> String {
    let mut parts = Vec::with_capacity(fields.len() + 1);
    parts.push("places.id".to_owned());
    parts.extend(
        fields
            .iter()
            .copied()
            .map(|field| format!("places.{}", provider_field(field))),
    );
    parts.join(",")
}

fn map_transport_error(error: reqwest::Error) -> PlaceSourceError {
    PlaceSourceError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PlaceSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    PlaceSourceError::transport(message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
