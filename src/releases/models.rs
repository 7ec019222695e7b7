// src/releases/models.rs
use serde::{Deserialize, Serialize};

/// One release scraped from the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Release tag, e.g. "v1.12.3". Empty if the tag link was not found.
    pub version_string: String,
    /// Raw HTML of the release notes. Empty if the notes container was not found.
    pub version_changes: String,
    /// Absolute download URLs in page order.
    pub asset_urls: Vec<String>,
}

/// Releases in page order (most recent first on GitHub).
pub type VersionList = Vec<VersionEntry>;

/// Entry of the GitHub releases API response. Only the tag is consumed.
/// Example: https://api.github.com/repos/PX4/Firmware/releases
#[derive(Debug, Deserialize)]
pub struct ApiRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}
