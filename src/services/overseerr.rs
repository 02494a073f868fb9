//! Overseerr / Jellyseerr API client.

use super::catalog::CatalogClient;
use crate::models::config::ServerConfig;
use crate::models::feed::{FeedKind, FeedPage};
use crate::models::media::{MediaKey, MediaKind};
use crate::models::remote::{RawCatalogItem, RawDetail, RawRequest, RequestPage};
use crate::models::request::{RequestSubmission, SeasonSelection};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_PREFIX: &str = "/api/v1";
const MAX_ERROR_BODY: usize = 200;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct OverseerrConfig {
    /// Base URL without the `/api/v1` suffix.
    pub base_url: String,
    /// API key, sent as `X-Api-Key`.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl OverseerrConfig {
    /// Build from the `[server]` config section.
    pub fn from_server_config(server: &ServerConfig) -> Result<Self> {
        let base_url = server.url.clone().ok_or(Error::ServerNotConfigured)?;
        Ok(Self {
            base_url,
            api_key: server.api_key.clone(),
            timeout_secs: server.timeout_secs,
        })
    }
}

/// HTTP implementation of [`CatalogClient`].
pub struct OverseerrClient {
    config: OverseerrConfig,
    client: reqwest::Client,
}

/// Server status response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub version: String,
    pub commit_tag: Option<String>,
}

/// Request list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestsResponse {
    #[serde(default)]
    page_info: PageInfo,
    #[serde(default)]
    results: Vec<RawRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    results: u64,
}

/// Request submission payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    media_type: &'static str,
    media_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seasons: Option<SeasonsField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root_folder: Option<&'a str>,
}

/// `seasons` is either a list of numbers or the keyword `"all"`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SeasonsField {
    Numbers(Vec<u32>),
    Keyword(&'static str),
}

impl<'a> RequestBody<'a> {
    fn from_submission(submission: &'a RequestSubmission) -> Self {
        let seasons = match &submission.seasons {
            Some(SeasonSelection::All) => Some(SeasonsField::Keyword("all")),
            Some(SeasonSelection::Seasons(numbers)) => Some(SeasonsField::Numbers(numbers.clone())),
            Some(SeasonSelection::Unspecified) | None => None,
        };

        Self {
            media_type: submission.media.kind.as_str(),
            media_id: submission.media.id,
            seasons,
            profile_id: submission.options.profile_id,
            root_folder: submission.options.root_folder.as_deref(),
        }
    }
}

impl OverseerrClient {
    /// Create a new client.
    pub fn new(config: OverseerrConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::validation(format!(
                "server URL must start with http:// or https://: {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("seerr_sync/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config: OverseerrConfig { base_url, ..config },
            client,
        })
    }

    /// Create a new client from the `[server]` config section.
    pub fn from_server_config(server: &ServerConfig) -> Result<Self> {
        Self::new(OverseerrConfig::from_server_config(server)?)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build a request with proper authentication.
    fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.config.base_url, API_PREFIX, path);
        let request = self.client.request(method, url);
        match &self.config.api_key {
            Some(key) => request.header("X-Api-Key", key),
            None => request,
        }
    }

    /// Send a request and fail on non-success status codes.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body: String = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_ERROR_BODY)
            .collect();
        let message = if body.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, body)
        };
        Err(Error::from_status(status.as_u16(), message))
    }

    /// Send a request and decode the JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = self.send(request).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Path and query string for a feed page.
    fn feed_path(feed: &FeedKind, page: u32) -> Result<String> {
        let path = match feed {
            FeedKind::Trending => "/discover/trending".to_string(),
            FeedKind::PopularMovies => "/discover/movies".to_string(),
            FeedKind::PopularShows => "/discover/tv".to_string(),
            FeedKind::UpcomingMovies => "/discover/movies/upcoming".to_string(),
            FeedKind::UpcomingShows => "/discover/tv/upcoming".to_string(),
            FeedKind::MoviesByGenre(id) => format!("/discover/movies/genre/{}", id),
            FeedKind::ShowsByGenre(id) => format!("/discover/tv/genre/{}", id),
            FeedKind::MoviesByStudio(id) => format!("/discover/movies/studio/{}", id),
            FeedKind::ShowsByNetwork(id) => format!("/discover/tv/network/{}", id),
            FeedKind::Search(query) => {
                let query = query.trim();
                if query.is_empty() {
                    return Err(Error::validation("search query is empty"));
                }
                // The server rejects '+' for spaces, so encode as %20 by hand
                return Ok(format!(
                    "/search?query={}&page={}",
                    urlencoding::encode(query),
                    page
                ));
            }
        };
        Ok(format!("{}?page={}", path, page))
    }

    /// Check that the server answers.
    pub async fn server_status(&self) -> Result<ServerStatus> {
        self.send_json(self.build_request(Method::GET, "/status"))
            .await
    }

    /// Verify the API key is accepted.
    pub async fn verify_api_key(&self) -> Result<bool> {
        match self.send(self.build_request(Method::GET, "/auth/me")).await {
            Ok(_) => Ok(true),
            Err(Error::Auth(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CatalogClient for OverseerrClient {
    async fn fetch_page(&self, feed: &FeedKind, page: u32) -> Result<FeedPage<RawCatalogItem>> {
        let path = Self::feed_path(feed, page)?;
        tracing::debug!("GET {} ({})", path, feed);
        self.send_json(self.build_request(Method::GET, &path)).await
    }

    async fn fetch_detail(&self, key: MediaKey) -> Result<RawDetail> {
        let path = match key.kind {
            MediaKind::Movie => format!("/movie/{}", key.id),
            MediaKind::Show => format!("/tv/{}", key.id),
        };
        tracing::debug!("GET {}", path);
        self.send_json(self.build_request(Method::GET, &path)).await
    }

    async fn fetch_my_requests(&self, page: u32, page_size: u32) -> Result<RequestPage> {
        let page = page.max(1);
        let skip = u64::from(page - 1) * u64::from(page_size);
        let request = self
            .build_request(Method::GET, "/request")
            .query(&[
                ("take", page_size.to_string()),
                ("skip", skip.to_string()),
                ("filter", "all".to_string()),
                ("sort", "added".to_string()),
            ]);

        tracing::debug!("GET /request (take={}, skip={})", page_size, skip);
        let resp: RequestsResponse = self.send_json(request).await?;
        Ok(RequestPage {
            items: resp.results,
            total_on_server: resp.page_info.results,
        })
    }

    async fn submit_request(&self, submission: &RequestSubmission) -> Result<RawRequest> {
        submission.validate()?;
        let body = RequestBody::from_submission(submission);
        tracing::debug!("POST /request ({})", submission.media);
        self.send_json(self.build_request(Method::POST, "/request").json(&body))
            .await
    }

    async fn delete_request(&self, id: u64) -> Result<()> {
        let path = format!("/request/{}", id);
        tracing::debug!("DELETE {}", path);
        self.send(self.build_request(Method::DELETE, &path)).await?;
        Ok(())
    }
}
