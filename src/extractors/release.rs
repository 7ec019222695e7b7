// src/extractors/release.rs

// --- Imports ---
use crate::extractors::pattern::match_pattern;
use crate::extractors::split::split;
use crate::releases::models::{VersionEntry, VersionList};

// --- Constants ---
// GitHub release page markup. These must match the served HTML exactly.
pub const GITHUB_RELEASE_MARKER: &str = "release-header";
pub const GITHUB_VERSION_PATTERN: &str = "/releases/tag/*\">";
pub const GITHUB_CHANGELOG_PATTERN: &str = "<div class=\"markdown-body\">\n*</div>";
pub const GITHUB_ASSETS_MARKER: &str = "Assets";
pub const GITHUB_ASSET_COUNT_PATTERN: &str = "<span title=\"*\"";
pub const GITHUB_ASSET_PATTERN: &str = "<a href=\"*\"";
pub const GITHUB_HOST: &str = "https://github.com";

// --- Data Structures ---

/// The literal markers and wildcard patterns used to carve releases out of
/// a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMarkup {
    pub release_marker: String,
    pub version_pattern: String,
    pub changelog_pattern: String,
    pub assets_marker: String,
    pub asset_count_pattern: String,
    pub asset_pattern: String,
    /// Prepended to every asset href.
    pub host: String,
}

impl Default for ReleaseMarkup {
    fn default() -> Self {
        Self {
            release_marker: GITHUB_RELEASE_MARKER.to_string(),
            version_pattern: GITHUB_VERSION_PATTERN.to_string(),
            changelog_pattern: GITHUB_CHANGELOG_PATTERN.to_string(),
            assets_marker: GITHUB_ASSETS_MARKER.to_string(),
            asset_count_pattern: GITHUB_ASSET_COUNT_PATTERN.to_string(),
            asset_pattern: GITHUB_ASSET_PATTERN.to_string(),
            host: GITHUB_HOST.to_string(),
        }
    }
}

impl ReleaseMarkup {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Wildcard patterns with a label, for debug annotation.
    pub fn labelled_patterns(&self) -> [(&str, &str); 4] {
        [
            (self.version_pattern.as_str(), "version"),
            (self.changelog_pattern.as_str(), "changelog"),
            (self.asset_count_pattern.as_str(), "count"),
            (self.asset_pattern.as_str(), "asset"),
        ]
    }
}

/// How the scraped tag is reported. Tags on some pages carry a leading
/// "v" or ".v"; whether that belongs to the version is left to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionPrefix {
    #[default]
    Keep,
    Strip,
}

// --- Main Extractor Structure ---
pub struct ReleaseExtractor {
    markup: ReleaseMarkup,
    version_prefix: VersionPrefix,
}

impl ReleaseExtractor {
    pub fn new(markup: ReleaseMarkup) -> Self {
        Self { markup, version_prefix: VersionPrefix::Keep }
    }

    pub fn with_version_prefix(mut self, version_prefix: VersionPrefix) -> Self {
        self.version_prefix = version_prefix;
        self
    }

    pub fn markup(&self) -> &ReleaseMarkup {
        &self.markup
    }

    /// Builds the version list for a whole listing page, one entry per
    /// release segment, in page order. Duplicates are kept.
    pub fn build_version_list(&self, document: &str) -> VersionList {
        let segments = self.segment(document);
        tracing::info!("Found {} release segments", segments.len());

        segments
            .into_iter()
            .map(|segment| self.extract(segment))
            .collect()
    }

    /// Returns the text of each release. Everything up to and including the
    /// first release marker is front matter and is dropped.
    pub fn segment<'d>(&self, document: &'d str) -> Vec<&'d str> {
        let marker = self.markup.release_marker.as_str();
        if marker.is_empty() {
            tracing::error!("Release marker is empty, cannot segment the page");
            return Vec::new();
        }

        match document.find(marker) {
            Some(first) => split(&document[first + marker.len()..], marker),
            None => {
                tracing::debug!("No '{}' marker in document, no releases", marker);
                Vec::new()
            }
        }
    }

    /// Extracts a single release. Missing fields are left empty; they never
    /// abort the extraction of the remaining fields.
    pub fn extract(&self, segment: &str) -> VersionEntry {
        let mut cursor = 0;

        let version_string = match match_pattern(&self.markup.version_pattern, segment, cursor) {
            Ok(found) => {
                cursor = found.next;
                self.normalize_version(found.value).to_string()
            }
            Err(e) => {
                tracing::warn!("Release segment has no version tag: {}", e);
                String::new()
            }
        };

        // Notes follow the tag link, so continue from the tag's cursor.
        let version_changes = match match_pattern(&self.markup.changelog_pattern, segment, cursor) {
            Ok(found) => found.value.to_string(),
            Err(e) => {
                tracing::debug!("No release notes for '{}': {}", version_string, e);
                String::new()
            }
        };

        let asset_urls = self.extract_assets(segment, &version_string);
        tracing::debug!("Release '{}': {} assets", version_string, asset_urls.len());

        VersionEntry { version_string, version_changes, asset_urls }
    }

    fn extract_assets(&self, segment: &str, version: &str) -> Vec<String> {
        let markup = &self.markup;

        let Some(assets_at) = segment.find(markup.assets_marker.as_str()) else {
            tracing::debug!("No '{}' section for '{}'", markup.assets_marker, version);
            return Vec::new();
        };
        let asset_text = &segment[assets_at..];

        let count = match match_pattern(&markup.asset_count_pattern, asset_text, 0) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Assets section of '{}' has no count: {}", version, e);
                return Vec::new();
            }
        };
        let Some(declared) = parse_asset_count(count.value) else {
            tracing::warn!("Unparsable asset count '{}' for '{}'", count.value, version);
            return Vec::new();
        };

        let mut urls = Vec::new();
        let mut cursor = count.next;
        for _ in 0..declared {
            match match_pattern(&markup.asset_pattern, asset_text, cursor) {
                Ok(found) => {
                    cursor = found.next;
                    urls.push(format!("{}{}", markup.host, found.value));
                }
                Err(e) => {
                    tracing::warn!(
                        "Release '{}' declares {} assets but only {} links were found ({})",
                        version,
                        declared,
                        urls.len(),
                        e
                    );
                    break;
                }
            }
        }
        urls
    }

    fn normalize_version<'v>(&self, raw: &'v str) -> &'v str {
        match self.version_prefix {
            VersionPrefix::Keep => raw,
            VersionPrefix::Strip => raw
                .strip_prefix(".v")
                .or_else(|| raw.strip_prefix('v'))
                .unwrap_or(raw),
        }
    }
}

impl Default for ReleaseExtractor {
    fn default() -> Self {
        Self::new(ReleaseMarkup::default())
    }
}

/// Parses the asset counter title. Decimal, or hexadecimal with an explicit
/// `0x`/`0X` prefix.
pub fn parse_asset_count(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Shapes a release the way the GitHub listing page does.
    fn release_block(tag: &str, notes: &str, assets: Option<&[&str]>) -> String {
        let mut html = format!(
            "<div class=\"release-header\">\n\
             <a href=\"/org/repo/releases/tag/{tag}\">{tag}</a>\n\
             <div class=\"markdown-body\">\n{notes}</div>\n"
        );
        if let Some(assets) = assets {
            html.push_str(&format!(
                "<summary>Assets <span title=\"{}\" class=\"Counter\">{}</span></summary>\n<ul>\n",
                assets.len(),
                assets.len()
            ));
            for href in assets {
                html.push_str(&format!("<li><a href=\"{href}\" rel=\"nofollow\">file</a></li>\n"));
            }
            html.push_str("</ul>\n");
        }
        html
    }

    const PREAMBLE: &str = "<html><head><title>Releases</title></head><body>\n\
        <a href=\"/org/repo/releases/tag/v0.0.1\">pinned</a>\n";

    #[test]
    fn three_markers_give_three_segments() {
        let doc = format!(
            "{PREAMBLE}{}{}{}</body></html>",
            release_block("v3", "<p>c</p>", None),
            release_block("v2", "<p>b</p>", None),
            release_block("v1", "<p>a</p>", None),
        );
        let extractor = ReleaseExtractor::default();
        let segments = extractor.segment(&doc);

        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| !s.contains("pinned")), "front matter leaked");
    }

    #[test]
    fn document_without_markers_has_no_releases() {
        let extractor = ReleaseExtractor::default();
        assert!(extractor.segment(PREAMBLE).is_empty());
        assert!(extractor.build_version_list(PREAMBLE).is_empty());
    }

    #[test]
    fn marker_at_document_start_keeps_first_release() {
        let doc = release_block("v9.0.0", "<p>n</p>", None);
        let list = ReleaseExtractor::default().build_version_list(&doc);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].version_string, "v9.0.0");
    }

    #[test]
    fn extracts_tag_notes_and_assets() {
        let segment = release_block(
            "v2.0.0",
            "<p>Fixed things</p>",
            Some(&["/org/repo/releases/download/v2.0.0/a.bin", "/org/repo/releases/download/v2.0.0/b.bin"]),
        );
        let entry = ReleaseExtractor::default().extract(&segment);

        assert_eq!(entry.version_string, "v2.0.0");
        assert_eq!(entry.version_changes, "<p>Fixed things</p>");
        assert_eq!(
            entry.asset_urls,
            vec![
                "https://github.com/org/repo/releases/download/v2.0.0/a.bin".to_string(),
                "https://github.com/org/repo/releases/download/v2.0.0/b.bin".to_string(),
            ]
        );
    }

    #[test]
    fn missing_assets_section_means_no_assets() {
        let segment = release_block("v1.0.0", "<p>x</p>", None);
        let entry = ReleaseExtractor::default().extract(&segment);
        assert!(entry.asset_urls.is_empty());
        assert_eq!(entry.version_string, "v1.0.0");
    }

    #[test]
    fn short_asset_list_when_count_overstates_links() {
        let segment = "\">Assets <span title=\"3\" class=\"Counter\">3</span>\n\
                       <a href=\"/d/one.zip\">one</a>\n<a href=\"/d/two.zip\">two</a>\n";
        let entry = ReleaseExtractor::default().extract(segment);
        assert_eq!(
            entry.asset_urls,
            vec!["https://github.com/d/one.zip".to_string(), "https://github.com/d/two.zip".to_string()]
        );
    }

    #[test]
    fn only_declared_number_of_links_is_taken() {
        let segment = "Assets <span title=\"1\"></span>\n\
                       <a href=\"/d/one.zip\">one</a>\n<a href=\"/source/archive.tar.gz\">src</a>\n";
        let entry = ReleaseExtractor::default().extract(segment);
        assert_eq!(entry.asset_urls, vec!["https://github.com/d/one.zip".to_string()]);
    }

    #[test]
    fn missing_version_still_yields_notes_and_assets() {
        let segment = "\">\n<div class=\"markdown-body\">\n<p>untagged</p></div>\n\
                       Assets <span title=\"1\"></span><a href=\"/d/x\">x</a>";
        let entry = ReleaseExtractor::default().extract(segment);
        assert_eq!(entry.version_string, "");
        assert_eq!(entry.version_changes, "<p>untagged</p>");
        assert_eq!(entry.asset_urls, vec!["https://github.com/d/x".to_string()]);
    }

    #[test]
    fn host_override_is_used_for_assets() {
        let markup = ReleaseMarkup::default().with_host("https://mirror.example");
        let segment = release_block("v1", "<p>n</p>", Some(&["/f.zip"]));
        let entry = ReleaseExtractor::new(markup).extract(&segment);
        assert_eq!(entry.asset_urls, vec!["https://mirror.example/f.zip".to_string()]);
    }

    #[test]
    fn version_prefix_is_kept_unless_stripping() {
        let keep = ReleaseExtractor::default();
        let strip = ReleaseExtractor::default().with_version_prefix(VersionPrefix::Strip);
        let segment = release_block("v1.4.0", "<p>n</p>", None);
        let dotted = release_block(".v1.4.0", "<p>n</p>", None);

        assert_eq!(keep.extract(&segment).version_string, "v1.4.0");
        assert_eq!(strip.extract(&segment).version_string, "1.4.0");
        assert_eq!(strip.extract(&dotted).version_string, "1.4.0");
    }

    #[test]
    fn asset_count_accepts_decimal_and_hex() {
        assert_eq!(parse_asset_count("2"), Some(2));
        assert_eq!(parse_asset_count(" 12 "), Some(12));
        assert_eq!(parse_asset_count("0x1A"), Some(26));
        assert_eq!(parse_asset_count("0X0"), Some(0));
        assert_eq!(parse_asset_count("two"), None);
        assert_eq!(parse_asset_count(""), None);
    }

    #[test]
    fn duplicate_releases_are_not_merged() {
        let block = release_block("v1.0.0", "<p>n</p>", None);
        let doc = format!("{PREAMBLE}{block}{block}");
        let list = ReleaseExtractor::default().build_version_list(&doc);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], list[1]);
    }

    #[test]
    fn two_release_page_end_to_end() {
        let doc = format!(
            "{PREAMBLE}{}{}</body></html>",
            release_block("v1.2.0", "<p>New app</p>", Some(&["/org/repo/releases/download/v1.2.0/app.zip"])),
            release_block("v1.1.0", "<p>Old</p>", Some(&[])),
        );
        let list = ReleaseExtractor::default().build_version_list(&doc);

        let summary: Vec<(&str, &[String])> = list
            .iter()
            .map(|e| (e.version_string.as_str(), e.asset_urls.as_slice()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("v1.2.0", &["https://github.com/org/repo/releases/download/v1.2.0/app.zip".to_string()][..]),
                ("v1.1.0", &[][..]),
            ]
        );
    }
}
