// crates/seats_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

pub use seats_core::{
    entities::{CandidateEntry, RegionInput},
    ids::{CandidateId, GroupingName, RegionIndex},
    variables::TiePolicy,
};

// ----------------------------- Region-level results ----------------------------------

/// A candidate who fills one of a grouping's seats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Winner {
    pub candidate_id: CandidateId,
    pub display_name: String,
    pub votes: u64,
}

/// Seat allocation for one region.
///
/// `seats_by_grouping` lists every grouping that had at least one candidate in
/// the region (zero seats included) and sums to `seat_count`; it is empty when
/// `seat_count == 0`. `winners_by_grouping` is present only in winner-detail mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionOutcome {
    pub region_index: RegionIndex,
    pub seat_count: u32,
    pub votes_by_grouping: BTreeMap<GroupingName, u64>,
    pub seats_by_grouping: BTreeMap<GroupingName, u32>,
    pub winners_by_grouping: Option<BTreeMap<GroupingName, Vec<Winner>>>,
    /// True iff the last awarded seat was decided among equal quotients.
    pub last_seat_tie: bool,
}

impl RegionOutcome {
    pub fn seats_awarded(&self) -> u32 {
        self.seats_by_grouping.values().sum()
    }
}

/// Why a region did not contribute to the national total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Vote data could not be obtained or decoded.
    DataUnavailable,
    /// Negative seat count, negative vote count, or vote-sum overflow.
    InvalidInput,
}

impl FailureKind {
    pub fn as_token(self) -> &'static str {
        match self {
            FailureKind::DataUnavailable => "data_unavailable",
            FailureKind::InvalidInput => "invalid_input",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionFailure {
    pub region_index: RegionIndex,
    pub kind: FailureKind,
    pub message: String,
}

/// Per-region result as fed into the national aggregation.
pub type RegionResult = Result<RegionOutcome, RegionFailure>;

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    pub mod dhondt;

    pub use dhondt::{allocate_dhondt, quotient_pool, DhondtOutcome, GroupTotal, Quotient};
    pub type DhondtError = dhondt::AllocError;
}

pub mod ranking;
pub mod region;
pub mod national;

pub use national::{aggregate_national, NationalOutcome, NationalTally};
pub use region::{allocate_region, AllocOptions, RegionError};
