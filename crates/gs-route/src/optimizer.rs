use std::collections::HashSet;

use log::debug;

/// Remove repeated domains, keeping the first occurrence of each.
/// Returns the number of entries removed.
pub fn dedupe_domains(domains: &mut Vec<String>) -> usize {
    let before = domains.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    domains.retain(|domain| seen.insert(domain.clone()));

    let removed = before - domains.len();
    if removed > 0 {
        debug!("Dedupe removed {} of {} domains", removed, before);
    }
    removed
}
