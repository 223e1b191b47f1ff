//! Core Matching Engine
//!
//! Every rule of every category is evaluated for each host; there is no
//! short-circuit per category. The first rule that hits a selector is kept as
//! its justification and later hits never overwrite it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::cache::PatternCache;
use crate::catalog::Catalog;
use crate::host::{normalize_host, normalize_rule_value, NormalizeError};
use crate::index::CatalogIndex;
use crate::rank::rank_matches;
use crate::types::{selector, MatchRecord, MatchType, Rule, Strategy};

// =============================================================================
// Rule Matcher
// =============================================================================

/// Evaluate one rule against a normalized host.
///
/// Returns the verdict and the strategy that produced it. Regex rules
/// populate `cache` on first use.
pub fn match_rule(host: &str, rule: &Rule, cache: &mut PatternCache) -> (bool, Strategy) {
    let strategy = rule.match_type.strategy();
    let value = normalize_rule_value(&rule.value);
    if value.is_empty() {
        return (false, strategy);
    }

    let matched = match rule.match_type {
        MatchType::Plain => host.contains(&*value),
        MatchType::DomainSuffix => is_domain_or_subdomain(host, &value),
        MatchType::Full => host == &*value,
        MatchType::Regex => cache
            .get_or_compile(&value)
            .is_some_and(|re| re.is_match(host)),
        // Conservative: exact only
        MatchType::Unknown(_) => host == &*value,
    };

    (matched, strategy)
}

/// `host` equals `domain` or ends with `.` + `domain`.
#[inline]
fn is_domain_or_subdomain(host: &str, domain: &str) -> bool {
    match host.strip_suffix(domain) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

// =============================================================================
// Category Scanner
// =============================================================================

#[derive(Debug, Clone)]
struct Justification<'c> {
    tag: &'c str,
    attribute: Option<&'c str>,
    strategy: Strategy,
    rule_value: &'c str,
}

/// Find every selector `host` belongs to. `host` must already be normalized.
///
/// The returned records are unordered; see [`rank_matches`].
pub fn scan_host(
    host: &str,
    catalog: &Catalog,
    index: &CatalogIndex,
    cache: &mut PatternCache,
) -> Vec<MatchRecord> {
    let mut hits: HashMap<String, Justification<'_>> = HashMap::new();

    for category in catalog.categories() {
        let tag = category.tag.as_str();

        for rule in &category.rules {
            let (matched, strategy) = match_rule(host, rule, cache);
            if !matched {
                continue;
            }

            record_first_hit(&mut hits, tag, None, strategy, &rule.value);
            for key in &rule.attributes {
                record_first_hit(&mut hits, tag, Some(key.as_str()), strategy, &rule.value);
            }
        }
    }

    hits.into_iter()
        .map(|(selector, why)| MatchRecord {
            group_size: index.group_size(why.tag, why.attribute),
            selector,
            tag: why.tag.to_string(),
            attribute: why.attribute.unwrap_or_default().to_string(),
            strategy: why.strategy,
            rule_value: why.rule_value.to_string(),
        })
        .collect()
}

fn record_first_hit<'c>(
    hits: &mut HashMap<String, Justification<'c>>,
    tag: &'c str,
    attribute: Option<&'c str>,
    strategy: Strategy,
    rule_value: &'c str,
) {
    if let Entry::Vacant(slot) = hits.entry(selector(tag, attribute)) {
        slot.insert(Justification {
            tag,
            attribute,
            strategy,
            rule_value,
        });
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Catalog, index and pattern cache bundled for a lookup run.
pub struct Scanner<'a> {
    catalog: &'a Catalog,
    index: CatalogIndex,
    cache: PatternCache,
}

impl<'a> Scanner<'a> {
    /// Build the index once and start with an empty pattern cache.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            index: CatalogIndex::build(catalog),
            cache: PatternCache::new(),
        }
    }

    /// Normalize `input`, scan it and rank the result.
    /// Returns the canonical host alongside its ranked matches.
    pub fn lookup(&mut self, input: &str) -> Result<(String, Vec<MatchRecord>), NormalizeError> {
        let host = normalize_host(input)?;
        let mut matches = scan_host(&host, self.catalog, &self.index, &mut self.cache);
        rank_matches(&mut matches);
        Ok((host, matches))
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn matches(host: &str, rule: &Rule) -> bool {
        let mut cache = PatternCache::new();
        match_rule(host, rule, &mut cache).0
    }

    fn ads_catalog() -> Catalog {
        Catalog::new(vec![Category::new(
            "ads",
            vec![
                Rule::new(MatchType::DomainSuffix, "ads.example.com"),
                Rule::new(MatchType::Plain, "track"),
            ],
        )])
    }

    #[test]
    fn domain_rule_anchors_at_label_boundary() {
        let rule = Rule::new(MatchType::DomainSuffix, "example.com");
        assert!(matches("example.com", &rule));
        assert!(matches("sub.example.com", &rule));
        assert!(!matches("xexample.com", &rule));
        assert!(!matches("notexample.com", &rule));
        assert!(!matches("example.com.evil.net", &rule));
    }

    #[test]
    fn full_rule_requires_equality_after_normalization() {
        let rule = Rule::new(MatchType::Full, "Example.com.");
        assert!(matches("example.com", &rule));
        assert!(!matches("www.example.com", &rule));

        let host = normalize_host("example.com.").expect("valid host");
        assert_eq!(host, normalize_rule_value("example.com"));
        assert!(matches(&host, &Rule::new(MatchType::Full, "example.com")));
    }

    #[test]
    fn plain_rule_is_substring() {
        let rule = Rule::new(MatchType::Plain, "ads");
        assert!(matches("myads.example.com", &rule));
        assert!(!matches("example.com", &rule));
    }

    #[test]
    fn regex_rule_is_unanchored_search() {
        let rule = Rule::new(MatchType::Regex, "ads?\\d+\\.");
        assert!(matches("www.ad12.example.com", &rule));
        assert!(!matches("example.com", &rule));

        let anchored = Rule::new(MatchType::Regex, "^cdn\\.");
        assert!(matches("cdn.example.com", &anchored));
        assert!(!matches("img.cdn.example.com", &anchored));
    }

    #[test]
    fn invalid_regex_fails_once_and_never_matches() {
        let mut cache = PatternCache::new();
        let rule = Rule::new(MatchType::Regex, "(ads");
        assert_eq!(match_rule("ads.com", &rule, &mut cache), (false, Strategy::Regex));
        assert_eq!(match_rule("ads.com", &rule, &mut cache), (false, Strategy::Regex));
        assert_eq!(cache.failures(), 1);
        assert_eq!(cache.compiles(), 1);
    }

    #[test]
    fn unknown_type_is_exact_only() {
        let rule = Rule::new(MatchType::Unknown(42), "example.com");
        let mut cache = PatternCache::new();
        assert_eq!(match_rule("example.com", &rule, &mut cache), (true, Strategy::Unknown));
        assert!(!matches("sub.example.com", &rule));
        assert!(!matches("xexample.com", &rule));
    }

    #[test]
    fn empty_value_never_matches() {
        for match_type in [MatchType::Plain, MatchType::DomainSuffix, MatchType::Regex] {
            assert!(!matches("example.com", &Rule::new(match_type, " . ")));
        }
    }

    #[test]
    fn scan_reports_base_selector_with_group_size() {
        let catalog = ads_catalog();
        let index = CatalogIndex::build(&catalog);
        let mut cache = PatternCache::new();

        let found = scan_host("sub.ads.example.com", &catalog, &index, &mut cache);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].selector, "geosite:ads");
        assert_eq!(found[0].group_size, 2);
        assert_eq!(found[0].strategy, Strategy::Domain);
        assert_eq!(found[0].rule_value, "ads.example.com");
        assert!(found[0].is_base());

        let found = scan_host("mytracking.net", &catalog, &index, &mut cache);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].selector, "geosite:ads");
        assert_eq!(found[0].group_size, 2);
        assert_eq!(found[0].strategy, Strategy::Plain);
        assert_eq!(found[0].rule_value, "track");

        assert!(scan_host("unrelated.org", &catalog, &index, &mut cache).is_empty());
    }

    #[test]
    fn first_hit_wins() {
        let catalog = Catalog::new(vec![Category::new(
            "svc",
            vec![
                Rule::new(MatchType::Plain, "track"),
                Rule::new(MatchType::Full, "tracker.example.com").with_attributes(["ext"]),
                Rule::new(MatchType::DomainSuffix, "example.com").with_attributes(["ext"]),
            ],
        )]);
        let index = CatalogIndex::build(&catalog);
        let mut cache = PatternCache::new();

        let mut found = scan_host("tracker.example.com", &catalog, &index, &mut cache);
        rank_matches(&mut found);
        assert_eq!(found.len(), 2);

        assert_eq!(found[0].selector, "geosite:svc@ext");
        assert_eq!(found[0].strategy, Strategy::Full);
        assert_eq!(found[0].group_size, 2);

        assert_eq!(found[1].selector, "geosite:svc");
        assert_eq!(found[1].strategy, Strategy::Plain);
        assert_eq!(found[1].group_size, 3);
    }

    #[test]
    fn attribute_selectors_carry_own_sizes() {
        let catalog = Catalog::new(vec![Category::new(
            "cn",
            vec![Rule::new(MatchType::DomainSuffix, "weibo.com").with_attributes(["cn", "ext"])],
        )]);
        let index = CatalogIndex::build(&catalog);
        let mut cache = PatternCache::new();

        let mut found = scan_host("m.weibo.com", &catalog, &index, &mut cache);
        rank_matches(&mut found);
        let selectors: Vec<(&str, usize)> =
            found.iter().map(|m| (m.selector.as_str(), m.group_size)).collect();
        assert_eq!(
            selectors,
            vec![("geosite:cn", 1), ("geosite:cn@cn", 1), ("geosite:cn@ext", 1)]
        );
        assert_eq!(found[1].attribute, "cn");
        assert_eq!(found[2].tag, "cn");
    }

    #[test]
    fn base_size_independent_of_hits() {
        let catalog = Catalog::new(vec![Category::new(
            "big",
            vec![
                Rule::new(MatchType::Full, "a.com"),
                Rule::new(MatchType::Full, "b.com"),
                Rule::new(MatchType::Full, "c.com"),
                Rule::new(MatchType::Full, "c.com"),
            ],
        )]);
        let index = CatalogIndex::build(&catalog);
        let mut cache = PatternCache::new();
        let found = scan_host("c.com", &catalog, &index, &mut cache);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].group_size, 4);
    }

    #[test]
    fn scan_is_idempotent() {
        let catalog = Catalog::new(vec![
            Category::new(
                "a",
                vec![
                    Rule::new(MatchType::Regex, "exam").with_attributes(["x"]),
                    Rule::new(MatchType::Plain, "ample"),
                ],
            ),
            Category::new("b", vec![Rule::new(MatchType::DomainSuffix, "example.com")]),
        ]);
        let mut scanner = Scanner::new(&catalog);
        let first = scanner.lookup("https://www.example.com/").expect("valid host");
        let second = scanner.lookup("https://www.example.com/").expect("valid host");
        assert_eq!(first, second);
        assert_eq!(first.0, "www.example.com");
        assert_eq!(first.1.len(), 3);
        assert_eq!(scanner.cache().compiles(), 1);
    }

    #[test]
    fn lookup_reports_normalization_errors() {
        let catalog = ads_catalog();
        let mut scanner = Scanner::new(&catalog);
        assert_eq!(scanner.lookup("   "), Err(NormalizeError::Empty));
        assert_eq!(scanner.index().base_size("ads"), 2);
    }
}
