//! Catalog Index
//!
//! Group sizes derived once from the catalog before any scan. The base size
//! of a tag is its rule count. The attribute size of `(tag, key)` is the
//! number of rules in that tag carrying `key`; a rule repeating a key still
//! counts once.

use std::collections::{HashMap, HashSet};

use crate::catalog::Catalog;

/// Immutable group-size tables.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    base: HashMap<String, usize>,
    attributes: HashMap<String, HashMap<String, usize>>,
}

impl CatalogIndex {
    /// Build the index from a decoded catalog.
    pub fn build(catalog: &Catalog) -> Self {
        let mut base: HashMap<String, usize> = HashMap::with_capacity(catalog.len());
        let mut attributes: HashMap<String, HashMap<String, usize>> =
            HashMap::with_capacity(catalog.len());

        for category in catalog.categories() {
            // Repeated tags accumulate
            *base.entry(category.tag.clone()).or_default() += category.rules.len();
            let sizes = attributes.entry(category.tag.clone()).or_default();

            let mut seen: HashSet<&str> = HashSet::new();
            for rule in &category.rules {
                seen.clear();
                for key in &rule.attributes {
                    if seen.insert(key.as_str()) {
                        *sizes.entry(key.clone()).or_default() += 1;
                    }
                }
            }
        }

        Self { base, attributes }
    }

    /// Rules in `tag`, or 0 for an unknown tag.
    pub fn base_size(&self, tag: &str) -> usize {
        self.base.get(tag).copied().unwrap_or(0)
    }

    /// Rules in `tag` carrying `key`, or 0 when absent.
    pub fn attribute_size(&self, tag: &str, key: &str) -> usize {
        self.attributes
            .get(tag)
            .and_then(|sizes| sizes.get(key))
            .copied()
            .unwrap_or(0)
    }

    /// Group size for a base (`attribute == None`) or attribute selector.
    pub fn group_size(&self, tag: &str, attribute: Option<&str>) -> usize {
        match attribute {
            Some(key) => self.attribute_size(tag, key),
            None => self.base_size(tag),
        }
    }

    /// Attribute sizes for one tag, sorted by key.
    pub fn attributes_of(&self, tag: &str) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = self
            .attributes
            .get(tag)
            .map(|sizes| sizes.iter().map(|(k, v)| (k.as_str(), *v)).collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    pub fn tag_count(&self) -> usize {
        self.base.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, MatchType, Rule};

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Category::new(
                "cn",
                vec![
                    Rule::new(MatchType::DomainSuffix, "weibo.com").with_attributes(["cn", "ext"]),
                    Rule::new(MatchType::DomainSuffix, "qq.com").with_attributes(["cn"]),
                    Rule::new(MatchType::Full, "qq.com"),
                ],
            ),
            Category::new("empty", vec![]),
        ])
    }

    #[test]
    fn base_size_counts_every_rule() {
        let index = CatalogIndex::build(&sample_catalog());
        assert_eq!(index.base_size("cn"), 3);
        assert_eq!(index.base_size("empty"), 0);
        assert_eq!(index.tag_count(), 2);
    }

    #[test]
    fn attribute_size_counts_rules() {
        let index = CatalogIndex::build(&sample_catalog());
        assert_eq!(index.attribute_size("cn", "cn"), 2);
        assert_eq!(index.attribute_size("cn", "ext"), 1);
        assert_eq!(index.attributes_of("cn"), vec![("cn", 2), ("ext", 1)]);
    }

    #[test]
    fn repeated_key_on_one_rule_counts_once() {
        let catalog = Catalog::new(vec![Category::new(
            "ads",
            vec![Rule::new(MatchType::Plain, "ad").with_attributes(["x", "x", "y"])],
        )]);
        let index = CatalogIndex::build(&catalog);
        assert_eq!(index.attribute_size("ads", "x"), 1);
        assert_eq!(index.attribute_size("ads", "y"), 1);
    }

    #[test]
    fn missing_entries_report_zero() {
        let index = CatalogIndex::build(&sample_catalog());
        assert_eq!(index.base_size("nope"), 0);
        assert_eq!(index.attribute_size("cn", "nope"), 0);
        assert_eq!(index.group_size("nope", Some("x")), 0);
        assert!(index.attributes_of("nope").is_empty());
    }
}
