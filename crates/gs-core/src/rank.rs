//! Result ordering
//!
//! Smallest group first, ties broken by selector name, so output is stable
//! regardless of the order the scanner discovered selectors in.

use std::cmp::Ordering;

use crate::types::MatchRecord;

/// Total order over match records: ascending group size, then selector.
pub fn compare_matches(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    a.group_size
        .cmp(&b.group_size)
        .then_with(|| a.selector.cmp(&b.selector))
}

/// Sort matches in place for presentation.
pub fn rank_matches(matches: &mut [MatchRecord]) {
    matches.sort_by(compare_matches);
}
