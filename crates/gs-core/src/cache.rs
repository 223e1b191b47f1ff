//! Run-scoped regex cache
//!
//! Keyed by the normalized regex source. A failed compile is stored as a
//! permanent miss so the error is logged once and never retried. Entries are
//! never evicted during a run.

use std::collections::HashMap;

use log::warn;
use regex::Regex;

/// Append-only map from pattern source to its compiled form.
#[derive(Debug, Default)]
pub struct PatternCache {
    /// `None` marks a pattern that failed to compile
    entries: HashMap<String, Option<Regex>>,
    compiles: usize,
    failures: usize,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled regex for `source`, compiling it on first use.
    /// Returns `None` for patterns that do not compile.
    pub fn get_or_compile(&mut self, source: &str) -> Option<&Regex> {
        if !self.entries.contains_key(source) {
            self.compiles += 1;
            let compiled = match Regex::new(source) {
                Ok(re) => Some(re),
                Err(e) => {
                    self.failures += 1;
                    warn!("Invalid regex rule {:?}: {}", source, e);
                    None
                }
            };
            self.entries.insert(source.to_string(), compiled);
        }
        self.entries.get(source).and_then(Option::as_ref)
    }

    /// Whether `source` has been seen, compiled or not.
    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compile attempts so far; one per distinct source.
    pub fn compiles(&self) -> usize {
        self.compiles
    }

    /// Distinct sources that failed to compile.
    pub fn failures(&self) -> usize {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_once() {
        let mut cache = PatternCache::new();
        assert!(cache.get_or_compile("^ads\\.").is_some());
        assert!(cache.get_or_compile("^ads\\.").is_some());
        assert_eq!(cache.compiles(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_cached_as_miss() {
        let mut cache = PatternCache::new();
        assert!(cache.get_or_compile("(unclosed").is_none());
        assert!(cache.get_or_compile("(unclosed").is_none());
        assert!(cache.contains("(unclosed"));
        assert_eq!(cache.compiles(), 1);
        assert_eq!(cache.failures(), 1);
    }

    #[test]
    fn test_distinct_sources() {
        let mut cache = PatternCache::new();
        cache.get_or_compile("a+");
        cache.get_or_compile("b+");
        cache.get_or_compile("[");
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.compiles(), 3);
        assert_eq!(cache.failures(), 1);
    }
}
