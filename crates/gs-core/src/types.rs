//! Core type definitions for geoscan
//!
//! These types mirror the decoded geosite catalog and are used throughout the
//! matching engine.

use std::fmt;

/// Prefix of every selector produced by the scanner.
pub const SELECTOR_PREFIX: &str = "geosite";

// =============================================================================
// Match Types (maps the Domain.type field of geosite.dat)
// =============================================================================

/// How a rule value is compared against a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// Substring anywhere in the host
    Plain,
    /// Exact host or any subdomain of it
    DomainSuffix,
    /// Exact host only
    Full,
    /// Regular expression, unanchored search
    Regex,
    /// Type code this build does not know; exact match only
    Unknown(i32),
}

impl MatchType {
    /// Map the integer code stored in the catalog.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Plain,
            1 => Self::Regex,
            2 => Self::DomainSuffix,
            3 => Self::Full,
            other => Self::Unknown(other),
        }
    }

    /// Integer code as stored in the catalog.
    pub fn code(self) -> i32 {
        match self {
            Self::Plain => 0,
            Self::Regex => 1,
            Self::DomainSuffix => 2,
            Self::Full => 3,
            Self::Unknown(code) => code,
        }
    }

    /// Strategy used to evaluate rules of this type.
    pub fn strategy(self) -> Strategy {
        match self {
            Self::Plain => Strategy::Plain,
            Self::DomainSuffix => Strategy::Domain,
            Self::Full => Strategy::Full,
            Self::Regex => Strategy::Regex,
            Self::Unknown(_) => Strategy::Unknown,
        }
    }
}

// =============================================================================
// Strategy
// =============================================================================

/// Name of the algorithm that decided a match, reported for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strategy {
    Plain,
    Domain,
    Full,
    Regex,
    Unknown,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Domain => "domain",
            Self::Full => "full",
            Self::Regex => "regex",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Catalog Records
// =============================================================================

/// A single domain rule inside a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub match_type: MatchType,
    /// Raw value as stored in the catalog
    pub value: String,
    /// Attribute keys in catalog order; may repeat
    pub attributes: Vec<String>,
}

impl Rule {
    pub fn new(match_type: MatchType, value: impl Into<String>) -> Self {
        Self {
            match_type,
            value: value.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the rule carries `key` at least once.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.iter().any(|a| a == key)
    }
}

/// A named group of rules (country code or service name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub tag: String,
    pub rules: Vec<Rule>,
}

impl Category {
    pub fn new(tag: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            tag: tag.into(),
            rules,
        }
    }
}

// =============================================================================
// Selectors
// =============================================================================

/// Build `geosite:<tag>` or `geosite:<tag>@<attr>`.
pub fn selector(tag: &str, attribute: Option<&str>) -> String {
    match attribute {
        Some(attr) => format!("{SELECTOR_PREFIX}:{tag}@{attr}"),
        None => format!("{SELECTOR_PREFIX}:{tag}"),
    }
}

// =============================================================================
// Match Record
// =============================================================================

/// One selector a host belongs to, with the rule that first justified it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub selector: String,
    pub tag: String,
    /// Empty for the base selector
    pub attribute: String,
    /// Number of rules backing the selector
    pub group_size: usize,
    pub strategy: Strategy,
    /// Raw value of the justifying rule
    pub rule_value: String,
}

impl MatchRecord {
    pub fn is_base(&self) -> bool {
        self.attribute.is_empty()
    }
}
