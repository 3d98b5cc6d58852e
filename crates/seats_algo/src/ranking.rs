//! Candidate ranking within a grouping.
//!
//! Candidates are ordered by descending personal votes. Equal votes are broken
//! by candidate id ascending, except under `TiePolicy::FirstSeen` where the
//! input order is kept (the sort is stable). The first `K` entries, `K` being
//! the grouping's seat count, are its winners.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use seats_core::{determinism::StableOrd, ids::GroupingName, variables::TiePolicy};

use crate::Winner;

/// Sort `candidates` in place into winner order.
pub fn rank_candidates(candidates: &mut [Winner], tie_policy: TiePolicy) {
    match tie_policy {
        TiePolicy::FirstSeen => candidates.sort_by(|a, b| b.votes.cmp(&a.votes)),
        TiePolicy::DeterministicOrder | TiePolicy::Random => candidates.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then_with(|| a.candidate_id.stable_cmp(&b.candidate_id))
        }),
    }
}

/// Pick the winners of every grouping in `seats`.
///
/// Groupings with zero seats map to an empty list. A grouping that won more
/// seats than it has candidates gets its full (shorter) list.
pub fn select_winners(
    mut by_grouping: BTreeMap<GroupingName, Vec<Winner>>,
    seats: &BTreeMap<GroupingName, u32>,
    tie_policy: TiePolicy,
) -> BTreeMap<GroupingName, Vec<Winner>> {
    let mut out = BTreeMap::new();
    for (grouping, &k) in seats {
        let mut list = by_grouping.remove(grouping).unwrap_or_default();
        rank_candidates(&mut list, tie_policy);
        list.truncate(k as usize);
        out.insert(grouping.clone(), list);
    }
    out
}
