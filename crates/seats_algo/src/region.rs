//! Region allocator: validate a `RegionInput`, total votes per grouping,
//! run D’Hondt, and (in winner-detail mode) rank candidates.
//!
//! One code path serves both modes; `AllocOptions::with_winners` only decides
//! whether the candidate lists are kept and ranked.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use seats_core::{
    entities::{CandidateEntry, RegionInput},
    ids::{CandidateId, GroupingName},
    rng::TieRng,
    variables::{TiePolicy, MAX_SEATS_PER_REGION},
};

use crate::allocation::dhondt::{self, GroupTotal};
use crate::{ranking, RegionOutcome, Winner};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocOptions {
    pub with_winners: bool,
    pub tie_policy: TiePolicy,
}

/// Reasons a region's input is rejected. No partial allocation is produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionError {
    NegativeSeatCount(i64),
    SeatCountTooLarge(i64),
    NegativeVoteCount { candidate_id: CandidateId, vote_count: i64 },
    VoteTotalOverflow(GroupingName),
    Alloc(dhondt::AllocError),
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionError::NegativeSeatCount(n) => write!(f, "negative seat count {n}"),
            RegionError::SeatCountTooLarge(n) => write!(f, "seat count {n} out of range"),
            RegionError::NegativeVoteCount { candidate_id, vote_count } => {
                write!(f, "candidate {candidate_id} has negative vote count {vote_count}")
            }
            RegionError::VoteTotalOverflow(g) => write!(f, "vote total of {g} overflows"),
            RegionError::Alloc(e) => write!(f, "allocation failed: {e:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegionError {}

impl From<dhondt::AllocError> for RegionError {
    fn from(e: dhondt::AllocError) -> Self { RegionError::Alloc(e) }
}

/// Allocate one region's seats.
///
/// `rng` is required only for `TiePolicy::Random` with a positive seat count.
pub fn allocate_region(
    input: &RegionInput,
    opts: AllocOptions,
    rng: Option<&mut TieRng>,
) -> Result<RegionOutcome, RegionError> {
    let seat_count = validate_seat_count(input.seat_count)?;
    let totals = group_totals(&input.candidates)?;

    let outcome = dhondt::allocate_dhondt(seat_count, &totals, opts.tie_policy, rng)?;

    let winners_by_grouping = if opts.with_winners {
        let lists = candidate_lists(&input.candidates)?;
        Some(ranking::select_winners(lists, &outcome.seats, opts.tie_policy))
    } else {
        None
    };

    Ok(RegionOutcome {
        region_index: input.region_index,
        seat_count,
        votes_by_grouping: totals.into_iter().map(|t| (t.grouping, t.votes)).collect(),
        seats_by_grouping: outcome.seats,
        winners_by_grouping,
        last_seat_tie: outcome.last_seat_tie,
    })
}

fn validate_seat_count(n: i64) -> Result<u32, RegionError> {
    if n < 0 {
        return Err(RegionError::NegativeSeatCount(n));
    }
    if n > MAX_SEATS_PER_REGION {
        return Err(RegionError::SeatCountTooLarge(n));
    }
    u32::try_from(n).map_err(|_| RegionError::SeatCountTooLarge(n))
}

fn checked_votes(c: &CandidateEntry) -> Result<u64, RegionError> {
    u64::try_from(c.vote_count).map_err(|_| RegionError::NegativeVoteCount {
        candidate_id: c.candidate_id,
        vote_count: c.vote_count,
    })
}

/// Vote totals per grouping, in order of first appearance.
/// Groupings without candidates never appear; zero-vote groupings do.
pub fn group_totals(candidates: &[CandidateEntry]) -> Result<Vec<GroupTotal>, RegionError> {
    let mut totals: Vec<GroupTotal> = Vec::new();
    let mut slot_of: BTreeMap<&GroupingName, usize> = BTreeMap::new();
    for c in candidates {
        let votes = checked_votes(c)?;
        match slot_of.get(&c.grouping) {
            Some(&slot) => {
                let t = &mut totals[slot];
                t.votes = t
                    .votes
                    .checked_add(votes)
                    .ok_or_else(|| RegionError::VoteTotalOverflow(c.grouping.clone()))?;
            }
            None => {
                slot_of.insert(&c.grouping, totals.len());
                totals.push(GroupTotal { grouping: c.grouping.clone(), votes });
            }
        }
    }
    Ok(totals)
}

fn candidate_lists(
    candidates: &[CandidateEntry],
) -> Result<BTreeMap<GroupingName, Vec<Winner>>, RegionError> {
    let mut lists: BTreeMap<GroupingName, Vec<Winner>> = BTreeMap::new();
    for c in candidates {
        lists.entry(c.grouping.clone()).or_default().push(Winner {
            candidate_id: c.candidate_id,
            display_name: c.display_name.clone(),
            votes: checked_votes(c)?,
        });
    }
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use seats_core::ids::RegionIndex;

    fn cand(id: i64, grouping: &str, votes: i64) -> CandidateEntry {
        CandidateEntry {
            candidate_id: CandidateId::new(id),
            grouping: GroupingName::new(grouping).unwrap(),
            display_name: format!("Candidate {id}"),
            vote_count: votes,
        }
    }

    fn input(seats: i64, candidates: Vec<CandidateEntry>) -> RegionInput {
        RegionInput { region_index: RegionIndex::new(1).unwrap(), seat_count: seats, candidates }
    }

    fn g(s: &str) -> GroupingName { GroupingName::new(s).unwrap() }

    #[test]
    fn totals_follow_first_appearance() {
        let cs = vec![cand(1, "B", 10), cand(2, "A", 5), cand(3, "B", 7)];
        let t = group_totals(&cs).unwrap();
        let got: Vec<(&str, u64)> = t.iter().map(|t| (t.grouping.as_str(), t.votes)).collect();
        assert_eq!(got, vec![("B", 17), ("A", 5)]);
    }

    #[test]
    fn allocates_and_ranks_winners() {
        let cs = vec![
            cand(1, "A", 40), cand(2, "A", 35), cand(3, "A", 25),
            cand(4, "B", 10), cand(5, "B", 40),
        ];
        let opts = AllocOptions { with_winners: true, tie_policy: TiePolicy::DeterministicOrder };
        let out = allocate_region(&input(4, cs), opts, None).unwrap();
        assert_eq!(out.seats_by_grouping[&g("A")], 3);
        assert_eq!(out.seats_by_grouping[&g("B")], 1);
        assert_eq!(out.seats_awarded(), 4);

        let winners = out.winners_by_grouping.unwrap();
        let a: Vec<i64> = winners[&g("A")].iter().map(|w| w.candidate_id.get()).collect();
        let b: Vec<i64> = winners[&g("B")].iter().map(|w| w.candidate_id.get()).collect();
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(b, vec![5]);
        assert_eq!(winners[&g("B")][0].display_name, "Candidate 5".to_string());
    }

    #[test]
    fn without_winner_detail_lists_are_absent() {
        let out = allocate_region(&input(2, vec![cand(1, "A", 3)]), AllocOptions::default(), None).unwrap();
        assert!(out.winners_by_grouping.is_none());
        assert_eq!(out.seats_by_grouping[&g("A")], 2);
    }

    #[test]
    fn zero_seats_empty_mapping_no_error() {
        let out = allocate_region(&input(0, vec![cand(1, "A", 3)]), AllocOptions::default(), None).unwrap();
        assert!(out.seats_by_grouping.is_empty());
        assert_eq!(out.votes_by_grouping[&g("A")], 3);
    }

    #[test]
    fn rejects_negative_seats_and_votes() {
        let err = allocate_region(&input(-1, vec![cand(1, "A", 3)]), AllocOptions::default(), None).unwrap_err();
        assert_eq!(err, RegionError::NegativeSeatCount(-1));

        let err = allocate_region(&input(2, vec![cand(7, "A", -3)]), AllocOptions::default(), None).unwrap_err();
        assert_eq!(
            err,
            RegionError::NegativeVoteCount { candidate_id: CandidateId::new(7), vote_count: -3 }
        );
    }

    #[test]
    fn huge_seat_count_is_rejected_before_allocating() {
        let cands = vec![cand(1, "A", 3), cand(2, "B", 2)];
        let err = allocate_region(&input(4_000_000_000, cands.clone()), AllocOptions::default(), None).unwrap_err();
        assert_eq!(err, RegionError::SeatCountTooLarge(4_000_000_000));

        let err = allocate_region(&input(MAX_SEATS_PER_REGION + 1, cands.clone()), AllocOptions::default(), None)
            .unwrap_err();
        assert_eq!(err, RegionError::SeatCountTooLarge(MAX_SEATS_PER_REGION + 1));

        let ok = allocate_region(&input(MAX_SEATS_PER_REGION, cands), AllocOptions::default(), None).unwrap();
        assert_eq!(ok.seats_awarded(), MAX_SEATS_PER_REGION as u32);
    }

    #[test]
    fn zero_vote_grouping_with_candidates_is_present() {
        let cs = vec![cand(1, "A", 500), cand(2, "B", 200), cand(3, "C", 0)];
        let out = allocate_region(&input(5, cs), AllocOptions::default(), None).unwrap();
        assert_eq!(out.seats_by_grouping.get(&g("C")), Some(&0));
        assert!(out.seats_by_grouping.get(&g("D")).is_none());
        assert_eq!(out.seats_awarded(), 5);
    }
}
