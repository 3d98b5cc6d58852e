//! Determinism utilities: stable total orders and descending presentation order.
//!
//! Every ordering that reaches an output goes through these helpers so that
//! equal counts never fall back to hash or completion order.

use core::cmp::Ordering;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::ids::{CandidateId, GroupingName, RegionIndex};

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for GroupingName {
    /// Byte-wise lexicographic order of the display name.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().as_bytes().cmp(other.as_str().as_bytes())
    }
}

impl StableOrd for CandidateId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

impl StableOrd for RegionIndex {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

/* -------------------------------------------------------------------------- */
/*                         Descending presentation order                      */
/* -------------------------------------------------------------------------- */

/// Compare `(key, count)` rows: count descending, then key by `StableOrd`.
#[inline]
pub fn cmp_count_desc<K: StableOrd, C: Ord>(a: &(K, C), b: &(K, C)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.stable_cmp(&b.0))
}

/// Materialize a count map as rows sorted by descending count (key tie-break).
pub fn sort_desc_by_count<K: StableOrd + Clone, C: Ord + Copy>(counts: &BTreeMap<K, C>) -> Vec<(K, C)> {
    let mut rows: Vec<(K, C)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    rows.sort_by(cmp_count_desc);
    rows
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn g(s: &str) -> GroupingName { GroupingName::new(s).unwrap() }

    #[test]
    fn grouping_order_is_bytewise() {
        assert_eq!(g("KO").stable_cmp(&g("Konfederacja")), Ordering::Less);
        assert_eq!(g("Lewica").stable_cmp(&g("KO")), Ordering::Greater);
    }

    #[test]
    fn desc_rows_break_ties_by_name() {
        let mut m = BTreeMap::new();
        m.insert(g("Lewica"), 3);
        m.insert(g("KO"), 7);
        m.insert(g("Konfederacja"), 3);
        m.insert(g("PiS"), 9);
        let rows = sort_desc_by_count(&m);
        let got: Vec<(&str, u32)> = rows.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(got, vec![("PiS", 9), ("KO", 7), ("Konfederacja", 3), ("Lewica", 3)]);
    }

    #[test]
    fn empty_map_gives_empty_rows() {
        let m: BTreeMap<GroupingName, u32> = BTreeMap::new();
        assert!(sort_desc_by_count(&m).is_empty());
    }
}
