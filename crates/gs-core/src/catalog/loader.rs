//! Catalog Loader

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use prost::Message;

use super::format::{attribute::TypedValue, Attribute, Domain, GeoSite, GeoSiteList};
use crate::types::{Category, MatchType, Rule, Strategy};

/// Error type for catalog loading. Fatal to the whole run.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("proto unmarshal geosite list: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Decoded, read-only rule catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

/// Rule totals per strategy, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyCounts {
    pub plain: usize,
    pub domain: usize,
    pub full: usize,
    pub regex: usize,
    pub unknown: usize,
}

impl Catalog {
    /// Build a catalog from in-memory categories. Empty attribute keys are dropped.
    pub fn new(mut categories: Vec<Category>) -> Self {
        for category in &mut categories {
            for rule in &mut category.rules {
                rule.attributes.retain(|key| !key.is_empty());
            }
        }
        Self { categories }
    }

    /// Decode a geosite.dat byte buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CatalogError> {
        let list = GeoSiteList::decode(data)?;
        let categories: Vec<Category> = list.entry.into_iter().map(category_from_wire).collect();

        let catalog = Self { categories };
        debug!(
            "Loaded {} categories with {} rules",
            catalog.len(),
            catalog.rule_count()
        );
        Ok(catalog)
    }

    /// Read and decode a geosite.dat file.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// First category with the given tag.
    pub fn get(&self, tag: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total rules across all categories.
    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }

    pub fn strategy_counts(&self) -> StrategyCounts {
        let mut counts = StrategyCounts::default();
        for rule in self.categories.iter().flat_map(|c| &c.rules) {
            match rule.match_type.strategy() {
                Strategy::Plain => counts.plain += 1,
                Strategy::Domain => counts.domain += 1,
                Strategy::Full => counts.full += 1,
                Strategy::Regex => counts.regex += 1,
                Strategy::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

/// Encode a catalog back to geosite.dat bytes.
pub fn encode_catalog(catalog: &Catalog) -> Vec<u8> {
    let list = GeoSiteList {
        entry: catalog
            .categories()
            .iter()
            .map(|category| GeoSite {
                country_code: category.tag.clone(),
                domain: category
                    .rules
                    .iter()
                    .map(|rule| Domain {
                        r#type: rule.match_type.code(),
                        value: rule.value.clone(),
                        attribute: rule
                            .attributes
                            .iter()
                            .map(|key| Attribute {
                                key: key.clone(),
                                typed_value: Some(TypedValue::BoolValue(true)),
                            })
                            .collect(),
                    })
                    .collect(),
                ..Default::default()
            })
            .collect(),
    };
    list.encode_to_vec()
}

fn category_from_wire(site: GeoSite) -> Category {
    let rules = site.domain.into_iter().map(rule_from_wire).collect();
    Category {
        tag: site.country_code,
        rules,
    }
}

fn rule_from_wire(domain: Domain) -> Rule {
    Rule {
        match_type: MatchType::from_code(domain.r#type),
        value: domain.value,
        attributes: domain
            .attribute
            .into_iter()
            .map(|a| a.key)
            .filter(|key| !key.is_empty())
            .collect(),
    }
}
