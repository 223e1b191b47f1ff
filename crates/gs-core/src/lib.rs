//! geoscan Core Library
//!
//! This crate provides the matching engine that classifies a host against a
//! geosite catalog and reports every selector the host belongs to.
//!
//! # Architecture
//!
//! The catalog is decoded once from a geosite.dat file into owned category
//! records. A [`CatalogIndex`] is derived from it before the first lookup and
//! stays read-only for the rest of the run. Each input host is normalized,
//! scanned against every rule of every category, and the resulting match
//! records are ranked by group size.
//!
//! # Modules
//!
//! - `catalog`: geosite.dat wire format and loader
//! - `host`: Host normalization for bare hosts, `host:port` and URLs
//! - `index`: Per-category and per-attribute group sizes
//! - `cache`: Run-scoped compiled regex cache
//! - `matcher`: Rule matching and the category scanner
//! - `rank`: Result ordering
//! - `types`: Shared type definitions

pub mod cache;
pub mod catalog;
pub mod host;
pub mod index;
pub mod matcher;
pub mod rank;
pub mod types;

// Re-export commonly used types
pub use cache::PatternCache;
pub use catalog::{Catalog, CatalogError};
pub use host::{normalize_host, NormalizeError};
pub use index::CatalogIndex;
pub use matcher::{match_rule, scan_host};
pub use rank::rank_matches;
pub use types::{Category, MatchRecord, MatchType, Rule, Strategy};
