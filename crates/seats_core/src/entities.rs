//! Domain entities shared by the loader, the allocator, and the pipeline.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{CandidateId, GroupingName, RegionIndex};

/// Votes for one candidate split across counting channels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoteRecord {
    pub candidate_id: CandidateId,
    pub urban: i64,
    pub rural: i64,
    pub maritime: i64,
    pub overseas: i64,
}

impl VoteRecord {
    /// Sum of all channels; `None` on `i64` overflow.
    pub fn total(&self) -> Option<i64> {
        self.urban
            .checked_add(self.rural)?
            .checked_add(self.maritime)?
            .checked_add(self.overseas)
    }

    /// First channel holding a negative count, as `(channel, count)`.
    pub fn negative_channel(&self) -> Option<(&'static str, i64)> {
        [
            ("urban", self.urban),
            ("rural", self.rural),
            ("maritime", self.maritime),
            ("overseas", self.overseas),
        ]
        .into_iter()
        .find(|&(_, n)| n < 0)
    }
}

/// One candidate as seen by the allocator: grouping already resolved, votes summed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateEntry {
    pub candidate_id: CandidateId,
    pub grouping: GroupingName,
    pub display_name: String,
    pub vote_count: i64,
}

/// Allocator input for a single region.
///
/// `seat_count` and `vote_count` are signed so that malformed upstream data
/// reaches the allocator and is rejected there instead of wrapping silently.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionInput {
    pub region_index: RegionIndex,
    pub seat_count: i64,
    pub candidates: Vec<CandidateEntry>,
}

/// Membership and display-name lookup for every registered candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateDirectory {
    membership: BTreeMap<CandidateId, GroupingName>,
    names: BTreeMap<CandidateId, String>,
}

impl CandidateDirectory {
    pub fn new() -> Self { Self::default() }

    /// Register a candidate. A later registration for the same id replaces the earlier one.
    pub fn insert(&mut self, id: CandidateId, grouping: GroupingName, name: impl Into<String>) {
        self.membership.insert(id, grouping);
        self.names.insert(id, name.into());
    }

    pub fn grouping_of(&self, id: CandidateId) -> Option<&GroupingName> {
        self.membership.get(&id)
    }

    pub fn name_of(&self, id: CandidateId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.membership.len() }

    pub fn is_empty(&self) -> bool { self.membership.is_empty() }
}
