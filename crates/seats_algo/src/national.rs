//! National aggregation: fold per-region seats into national totals.
//!
//! Regions are folded in the order given (region order in the pipeline).
//! Failed regions are recorded and skipped; they never abort the fold.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use seats_core::{determinism::sort_desc_by_count, ids::{GroupingName, RegionIndex}};

use crate::{RegionFailure, RegionOutcome, RegionResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NationalOutcome {
    pub seats_by_grouping: BTreeMap<GroupingName, u64>,
    /// Descending seats; ties by grouping name ascending.
    pub ranking: Vec<(GroupingName, u64)>,
    pub regions_counted: Vec<RegionIndex>,
    pub failed_regions: Vec<RegionFailure>,
    /// Σ seats over counted regions (equals Σ of `seats_by_grouping`).
    pub seats_allocated: u64,
}

/// Running national total.
#[derive(Clone, Debug, Default)]
pub struct NationalTally {
    totals: BTreeMap<GroupingName, u64>,
    regions_counted: Vec<RegionIndex>,
    failed: Vec<RegionFailure>,
    seats_allocated: u64,
}

impl NationalTally {
    pub fn new() -> Self { Self::default() }

    pub fn add_region(&mut self, outcome: &RegionOutcome) {
        for (grouping, &seats) in &outcome.seats_by_grouping {
            *self.totals.entry(grouping.clone()).or_insert(0) += u64::from(seats);
            self.seats_allocated += u64::from(seats);
        }
        self.regions_counted.push(outcome.region_index);
    }

    pub fn add_failure(&mut self, failure: RegionFailure) {
        self.failed.push(failure);
    }

    pub fn add_result(&mut self, result: &RegionResult) {
        match result {
            Ok(outcome) => self.add_region(outcome),
            Err(failure) => self.add_failure(failure.clone()),
        }
    }

    pub fn finish(self) -> NationalOutcome {
        let ranking = sort_desc_by_count(&self.totals);
        NationalOutcome {
            seats_by_grouping: self.totals,
            ranking,
            regions_counted: self.regions_counted,
            failed_regions: self.failed,
            seats_allocated: self.seats_allocated,
        }
    }
}

/// Aggregate an ordered sequence of region results.
pub fn aggregate_national(results: &[RegionResult]) -> NationalOutcome {
    let mut tally = NationalTally::new();
    for r in results {
        tally.add_result(r);
    }
    tally.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;
    use alloc::string::ToString;

    fn g(s: &str) -> GroupingName { GroupingName::new(s).unwrap() }
    fn r(n: u32) -> RegionIndex { RegionIndex::new(n).unwrap() }

    fn outcome(n: u32, seats: &[(&str, u32)]) -> RegionOutcome {
        RegionOutcome {
            region_index: r(n),
            seat_count: seats.iter().map(|(_, s)| s).sum(),
            votes_by_grouping: BTreeMap::new(),
            seats_by_grouping: seats.iter().map(|(k, v)| (g(k), *v)).collect(),
            winners_by_grouping: None,
            last_seat_tie: false,
        }
    }

    #[test]
    fn sums_and_orders_descending() {
        let results: Vec<RegionResult> = vec![
            Ok(outcome(1, &[("PiS", 5), ("KO", 4), ("Lewica", 1)])),
            Ok(outcome(2, &[("KO", 6), ("PiS", 2), ("TD", 0)])),
        ];
        let nat = aggregate_national(&results);
        assert_eq!(nat.seats_by_grouping[&g("KO")], 10);
        assert_eq!(nat.seats_by_grouping[&g("PiS")], 7);
        assert_eq!(nat.seats_by_grouping[&g("TD")], 0);
        let order: Vec<&str> = nat.ranking.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["KO", "PiS", "Lewica", "TD"]);
        assert_eq!(nat.seats_allocated, 18);
        assert_eq!(nat.seats_by_grouping.values().sum::<u64>(), nat.seats_allocated);
    }

    #[test]
    fn failed_regions_are_recorded_and_skipped() {
        let results: Vec<RegionResult> = vec![
            Ok(outcome(1, &[("A", 3)])),
            Err(RegionFailure {
                region_index: r(2),
                kind: FailureKind::DataUnavailable,
                message: "missing".to_string(),
            }),
            Ok(outcome(3, &[("A", 1), ("B", 2)])),
        ];
        let nat = aggregate_national(&results);
        assert_eq!(nat.regions_counted, vec![r(1), r(3)]);
        assert_eq!(nat.failed_regions.len(), 1);
        assert_eq!(nat.failed_regions[0].region_index, r(2));
        assert_eq!(nat.seats_by_grouping[&g("A")], 4);
        assert_eq!(nat.seats_allocated, 6);
    }

    #[test]
    fn equal_totals_break_by_name() {
        let results: Vec<RegionResult> = vec![Ok(outcome(1, &[("Zeta", 2), ("Alpha", 2)]))];
        let nat = aggregate_national(&results);
        let order: Vec<&str> = nat.ranking.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn empty_input_gives_empty_total() {
        let results: Vec<RegionResult> = Vec::new();
        let nat = aggregate_national(&results);
        assert!(nat.ranking.is_empty());
        assert_eq!(nat.seats_allocated, 0);
    }
}
