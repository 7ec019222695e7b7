// src/main.rs
mod utils;
mod releases;
mod extractors;
mod storage;

use std::time::Duration;
use clap::{Parser, ValueEnum};
use utils::AppError;
use releases::client::{self, FetchOptions};
use releases::models::VersionList;
use extractors::{ReleaseExtractor, ReleaseMarkup, VersionPrefix};
use storage::StorageManager;

/// Where the release list comes from
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    /// Scrape the HTML release listing page
    Html,
    /// Query the JSON releases API (tags only)
    Api,
}

/// Command Line Interface for the release page scraper
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Release listing page to scrape
    #[arg(short, long, default_value = "https://github.com/PX4/Firmware/releases")]
    url: String,

    /// Host prepended to relative asset links
    #[arg(long, default_value = "https://github.com")]
    host: String,

    /// Release source
    #[arg(long, value_enum, default_value_t = Source::Html)]
    source: Source,

    /// Repository ("owner/name") for the API source
    #[arg(long, default_value = "PX4/Firmware")]
    repo: String,

    /// Base URL of the releases API
    #[arg(long, default_value = "https://api.github.com")]
    api_base: String,

    /// Directory for tracked releases, versions.json and debug output
    #[arg(short, long, default_value = "./releases")]
    output_dir: String,

    /// Create a directory per release and report which ones are new
    #[arg(long)]
    track: bool,

    /// Save the scraped version list as versions.json
    #[arg(long)]
    save: bool,

    /// Strip a leading "v" or ".v" from version tags
    #[arg(long)]
    strip_version_prefix: bool,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = client::DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    /// Debug mode - save the raw page and an annotated copy with matches highlighted
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(if args.debug { "debug" } else { "info" });
    tracing::info!("Starting with args: {:?}", args);

    let options = FetchOptions {
        connect_timeout: Duration::from_secs(args.connect_timeout_secs),
    };

    // 3. Storage is only needed when something gets written
    let storage = if args.track || args.save || args.debug {
        Some(StorageManager::new(&args.output_dir)?)
    } else {
        None
    };

    match args.source {
        Source::Html => run_html(&args, &options, storage.as_ref()).await,
        Source::Api => run_api(&args, &options, storage.as_ref()).await,
    }
}

async fn run_html(args: &Args, options: &FetchOptions, storage: Option<&StorageManager>) -> Result<(), AppError> {
    let version_prefix = if args.strip_version_prefix { VersionPrefix::Strip } else { VersionPrefix::Keep };
    let extractor = ReleaseExtractor::new(ReleaseMarkup::default().with_host(args.host.as_str()))
        .with_version_prefix(version_prefix);

    let versions = match storage.filter(|_| args.debug) {
        Some(storage) => {
            let document = client::fetch_release_page(&args.url, options).await?;
            save_debug_files(&document, &extractor, storage)?;
            extractor.build_version_list(&document)
        }
        None => client::scrape_releases(&args.url, &extractor, options).await?,
    };

    if versions.is_empty() {
        tracing::warn!("No releases found on {}", args.url);
    }
    print_versions(&versions);

    if let Some(storage) = storage {
        if args.track {
            let tags: Vec<&str> = versions
                .iter()
                .map(|v| v.version_string.as_str())
                .filter(|tag| !tag.is_empty())
                .collect();
            track_all(storage, &tags)?;
        }
        if args.save {
            storage.save_version_list(&versions, &args.url)?;
        }
    }

    Ok(())
}

async fn run_api(args: &Args, options: &FetchOptions, storage: Option<&StorageManager>) -> Result<(), AppError> {
    if args.save {
        return Err(AppError::Config("--save needs the html source; the API source only lists tags".to_string()));
    }

    let tags = client::fetch_release_tags(&args.api_base, &args.repo, options).await?;
    for tag in &tags {
        println!("{}", tag);
    }

    if let (Some(storage), true) = (storage, args.track) {
        let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
        track_all(storage, &tags)?;
    }

    Ok(())
}

/// Creates a directory per tag. A bad tag is logged and skipped.
fn track_all(storage: &StorageManager, tags: &[&str]) -> Result<(), AppError> {
    let mut new_count = 0;
    for tag in tags {
        match storage.track_release(tag) {
            Ok(true) => new_count += 1,
            Ok(false) => {}
            Err(utils::error::StorageError::InvalidTag(tag)) => {
                tracing::warn!("Not tracking release with unusable tag '{}'", tag)
            }
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!("Tracking finished. New: {}, Total: {}", new_count, tags.len());
    Ok(())
}

fn save_debug_files(document: &str, extractor: &ReleaseExtractor, storage: &StorageManager) -> Result<(), AppError> {
    let debug_dir = storage.base_dir().join("debug");
    std::fs::create_dir_all(&debug_dir)?;

    let raw_path = debug_dir.join("raw_page.html");
    std::fs::write(&raw_path, document)?;
    tracing::info!("Saved raw page to: {}", raw_path.display());

    let markup = extractor.markup();
    let markers = [
        (markup.release_marker.as_str(), "release"),
        (markup.assets_marker.as_str(), "release"),
    ];
    let annotated_path = debug_dir.join("page_annotated.html");
    if let Err(e) = utils::html_debug::create_debug_html(document, &annotated_path, &markup.labelled_patterns(), &markers) {
        tracing::warn!("Failed to create debug HTML: {}", e);
    }
    Ok(())
}

fn print_versions(versions: &VersionList) {
    for version in versions {
        println!("Version: {}", version.version_string);
        println!("Assets: {}", version.asset_urls.len());
        for url in &version.asset_urls {
            println!("--> {}", url);
        }
        println!();
    }
}
