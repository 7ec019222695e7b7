// src/extractors/mod.rs
pub mod pattern;
pub mod release;
pub mod split;

// Re-export key extraction types for convenience
pub use release::{ReleaseExtractor, ReleaseMarkup, VersionPrefix};
