// src/releases/client.rs
use crate::extractors::release::ReleaseExtractor;
use crate::releases::models::{ApiRelease, VersionList};
use crate::utils::error::{AppError, FetchError};
use reqwest::header;
use std::time::Duration;

const USER_AGENT: &str = concat!("release-scraper/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Transport settings for a single fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS) }
    }
}

/// Creates a reqwest client. Redirects are followed (reqwest default policy).
fn build_client(options: &FetchOptions) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(options.connect_timeout)
        .build()
}

/// Maps non-2xx responses onto `FetchError`.
fn check_status(response: &reqwest::Response, url: &str) -> Result<(), FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    tracing::error!("HTTP error status: {} for URL: {}", status, url);
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(url.to_string()));
    }
    Err(FetchError::Http(status))
}

/// Downloads the release listing page. An empty body counts as a failure.
pub async fn fetch_release_page(url: &str, options: &FetchOptions) -> Result<String, FetchError> {
    let client = build_client(options)?;

    tracing::info!("Downloading release page from: {}", url);

    let response = client
        .get(url)
        .header(header::ACCEPT, "text/html,*/*")
        .send()
        .await?; // Propagates reqwest::Error as FetchError::Network

    check_status(&response, url)?;

    let body = response.text().await?;
    if body.is_empty() {
        tracing::error!("Failed to retrieve data from URL {}: empty body", url);
        return Err(FetchError::EmptyBody(url.to_string()));
    }

    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
    Ok(body)
}

/// Lists release tags of `repo` ("owner/name") through the JSON releases API,
/// in the order the API returns them.
pub async fn fetch_release_tags(
    api_base: &str,
    repo: &str,
    options: &FetchOptions,
) -> Result<Vec<String>, FetchError> {
    let url = format!("{}/repos/{}/releases", api_base.trim_end_matches('/'), repo);
    let client = build_client(options)?;

    tracing::info!("Querying releases API: {}", url);

    let response = client
        .get(&url)
        .header(header::ACCEPT, "application/vnd.github.v3+json")
        .send()
        .await?;

    check_status(&response, &url)?;

    let body = response.text().await?;
    if body.is_empty() {
        return Err(FetchError::EmptyBody(url));
    }

    let releases: Vec<ApiRelease> = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!("Failed to parse releases API response: {}", e);
        FetchError::Parse(e.to_string())
    })?;

    tracing::info!("Found {} releases", releases.len());
    for release in releases.iter().filter(|r| r.draft || r.prerelease) {
        tracing::debug!(
            "Release {} ({}) is a draft or prerelease",
            release.tag_name,
            release.name.as_deref().unwrap_or("unnamed")
        );
    }

    Ok(releases.into_iter().map(|r| r.tag_name).collect())
}

/// Fetches the listing page and extracts every release from it.
/// A fetch failure aborts the whole call; no partial list is returned.
pub async fn scrape_releases(
    url: &str,
    extractor: &ReleaseExtractor,
    options: &FetchOptions,
) -> Result<VersionList, AppError> {
    let document = fetch_release_page(url, options).await?;
    Ok(extractor.build_version_list(&document))
}
