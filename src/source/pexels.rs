//! Pexels-compatible search adapter.
//!
//! Issues `GET {endpoint}/search?query=..&per_page=..&page=..` with the API
//! key in the `Authorization` header and normalizes the `photos` array.
//! Records are decoded one by one so a single malformed record only drops
//! itself, never the page.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use thiserror::Error;

use super::{DEFAULT_QUERY, FetchError, ImageSource, PageRequest, PageResult};
use crate::gallery::{Dimensions, ImageItem, ItemId};

pub const DEFAULT_ENDPOINT: &str = "https://api.pexels.com/v1";

/// Largest page size the search endpoint accepts.
pub const MAX_PER_PAGE: u32 = 80;

/// Environment variable consulted for the API key.
pub const API_KEY_ENV: &str = "PEXELS_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum SourceConfigError {
    #[error("no API key: pass --api-key or set {API_KEY_ENV}")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Why a single feed record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedItem {
    #[error("record is not a photo object: {0}")]
    Shape(String),
    #[error("record has no id")]
    MissingId,
    #[error("record {0} has no image URL")]
    MissingUrl(ItemId),
    #[error("record {id} has invalid dimensions {width}x{height}")]
    InvalidDimensions { id: ItemId, width: i64, height: i64 },
}

pub struct PexelsSource {
    client: Client,
    endpoint: String,
    api_key: String,
    default_query: String,
}

impl std::fmt::Debug for PexelsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PexelsSource")
            .field("endpoint", &self.endpoint)
            .field("default_query", &self.default_query)
            .finish_non_exhaustive()
    }
}

impl PexelsSource {
    /// Create an adapter for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the key is blank or the HTTP client cannot be
    /// built.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, SourceConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SourceConfigError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mosaic/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            default_query: DEFAULT_QUERY.to_string(),
        })
    }

    /// Search term substituted for blank queries.
    #[must_use]
    pub fn with_default_query(mut self, query: impl Into<String>) -> Self {
        self.default_query = query.into();
        self
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.endpoint.trim_end_matches('/'))
    }
}

impl ImageSource for PexelsSource {
    fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, FetchError> {
        let _scope = crate::perf::scope("source.fetch_page");
        let query = request.effective_query(&self.default_query);
        let per_page = request.per_page.clamp(1, MAX_PER_PAGE);
        crate::perf::log_event(
            "source.request",
            format!("query={query} page={} per_page={per_page}", request.page),
        );

        let response = self
            .client
            .get(self.search_url())
            .header(AUTHORIZATION, &self.api_key)
            .query(&[
                ("query", query.to_string()),
                ("per_page", per_page.to_string()),
                ("page", request.page.to_string()),
            ])
            .send()
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }
        let body = response.text().map_err(classify_transport)?;
        let page = parse_search_response(&body)?;
        crate::perf::log_event(
            "source.response",
            format!(
                "page={} items={} dropped={} end={}",
                request.page,
                page.items.len(),
                page.dropped,
                page.end_of_results
            ),
        );
        Ok(page)
    }
}

fn classify_status(status: StatusCode) -> FetchError {
    let message = format!("HTTP {status}");
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        FetchError::Transient(message)
    } else {
        FetchError::Permanent(message)
    }
}

fn classify_transport(err: reqwest::Error) -> FetchError {
    if err.is_decode() || err.is_builder() {
        FetchError::Permanent(err.to_string())
    } else {
        FetchError::Transient(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<serde_json::Value>,
    #[serde(default)]
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawSrc {
    large: Option<String>,
    large2x: Option<String>,
    original: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    id: Option<RawId>,
    width: Option<i64>,
    height: Option<i64>,
    #[serde(default)]
    alt: Option<String>,
    photographer: Option<String>,
    photographer_url: Option<String>,
    url: Option<String>,
    avg_color: Option<String>,
    #[serde(default)]
    src: RawSrc,
}

/// Decode a search response body into a page.
///
/// # Errors
///
/// Returns [`FetchError::Permanent`] when the body is not a search response.
pub fn parse_search_response(body: &str) -> Result<PageResult, FetchError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|err| FetchError::Permanent(format!("undecodable response: {err}")))?;

    let raw_count = response.photos.len();
    let mut items = Vec::with_capacity(raw_count);
    let mut dropped = 0;
    for value in response.photos {
        match normalize(value) {
            Ok(item) => items.push(item),
            Err(reason) => {
                dropped += 1;
                tracing::debug!(%reason, "dropping malformed record");
            }
        }
    }

    Ok(PageResult {
        items,
        end_of_results: raw_count == 0 || response.next_page.is_none(),
        dropped,
    })
}

fn normalize(value: serde_json::Value) -> Result<ImageItem, MalformedItem> {
    let raw: RawPhoto =
        serde_json::from_value(value).map_err(|err| MalformedItem::Shape(err.to_string()))?;

    let id = match raw.id {
        Some(RawId::Number(n)) => ItemId::from(n),
        Some(RawId::Text(s)) if !s.trim().is_empty() => ItemId::new(s),
        _ => return Err(MalformedItem::MissingId),
    };

    let dimensions = match (raw.width, raw.height) {
        (Some(width), Some(height)) => {
            let sized = u32::try_from(width)
                .ok()
                .zip(u32::try_from(height).ok())
                .and_then(|(w, h)| Dimensions::new(w, h));
            if sized.is_none() {
                return Err(MalformedItem::InvalidDimensions { id, width, height });
            }
            sized
        }
        // Absent dimensions fall back to a square; only bad values drop the record.
        (Some(bad), None) | (None, Some(bad)) if bad <= 0 => {
            return Err(MalformedItem::InvalidDimensions {
                id,
                width: raw.width.unwrap_or_default(),
                height: raw.height.unwrap_or_default(),
            });
        }
        _ => None,
    };

    let Some(url) = raw
        .src
        .large
        .or(raw.src.large2x)
        .or(raw.src.original)
        .filter(|u| !u.trim().is_empty())
    else {
        return Err(MalformedItem::MissingUrl(id));
    };

    Ok(ImageItem::new(id, url)
        .with_alt(raw.alt.unwrap_or_default())
        .with_dimensions(dimensions)
        .with_photographer(raw.photographer, raw.photographer_url)
        .with_page_url(raw.url)
        .with_avg_color(raw.avg_color))
}
