//! BUILD_INPUT stage: join a region's vote records with the candidate directory.

use tracing::warn;

use seats_algo::{FailureKind, RegionFailure};
use seats_core::{
    entities::{CandidateDirectory, CandidateEntry, RegionInput},
    ids::{GroupingName, RegionIndex},
};
use seats_io::source::RegionVotes;

/// Build the allocator input for one region.
///
/// Records keep their source order. A candidate missing from the directory is
/// placed in the `<unknown>` grouping under its id as display name. A record
/// with a negative channel, or whose channels overflow `i64`, rejects the
/// whole region.
pub fn build_region_input(
    region: RegionIndex,
    seat_count: i64,
    votes: &RegionVotes,
    directory: &CandidateDirectory,
) -> Result<RegionInput, RegionFailure> {
    let mut candidates = Vec::with_capacity(votes.records.len());
    for rec in &votes.records {
        if let Some((channel, n)) = rec.negative_channel() {
            return Err(RegionFailure {
                region_index: region,
                kind: FailureKind::InvalidInput,
                message: format!("candidate {} has negative {channel} vote count {n}", rec.candidate_id),
            });
        }
        let vote_count = rec.total().ok_or_else(|| RegionFailure {
            region_index: region,
            kind: FailureKind::InvalidInput,
            message: format!("vote channels of candidate {} overflow", rec.candidate_id),
        })?;

        let grouping = match directory.grouping_of(rec.candidate_id) {
            Some(g) => g.clone(),
            None => {
                warn!(region = %region, candidate = %rec.candidate_id, "candidate not in any committee");
                GroupingName::unknown()
            }
        };
        let display_name = directory
            .name_of(rec.candidate_id)
            .map_or_else(|| rec.candidate_id.to_string(), str::to_string);

        candidates.push(CandidateEntry { candidate_id: rec.candidate_id, grouping, display_name, vote_count });
    }
    Ok(RegionInput { region_index: region, seat_count, candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seats_core::{entities::VoteRecord, ids::CandidateId};

    fn rec(id: i64, urban: i64, rural: i64) -> VoteRecord {
        VoteRecord { candidate_id: CandidateId::new(id), urban, rural, maritime: 0, overseas: 0 }
    }

    fn directory() -> CandidateDirectory {
        let mut d = CandidateDirectory::new();
        d.insert(CandidateId::new(1), GroupingName::new("KO").unwrap(), "Anna Nowak");
        d.insert(CandidateId::new(2), GroupingName::new("PiS").unwrap(), "Jan Kowalski");
        d
    }

    #[test]
    fn joins_membership_names_and_sums() {
        let r = RegionIndex::new(4).unwrap();
        let votes = RegionVotes { region_index: r, records: vec![rec(2, 10, 5), rec(1, 3, 0)], sha256: None };
        let input = build_region_input(r, 12, &votes, &directory()).unwrap();
        assert_eq!(input.seat_count, 12);
        assert_eq!(input.candidates[0].grouping.as_str(), "PiS");
        assert_eq!(input.candidates[0].vote_count, 15);
        assert_eq!(input.candidates[1].display_name, "Anna Nowak");
    }

    #[test]
    fn unknown_candidate_goes_to_unknown_grouping() {
        let r = RegionIndex::new(1).unwrap();
        let votes = RegionVotes { region_index: r, records: vec![rec(99, 7, 0)], sha256: None };
        let input = build_region_input(r, 3, &votes, &directory()).unwrap();
        assert_eq!(input.candidates[0].grouping.as_str(), GroupingName::UNKNOWN);
        assert_eq!(input.candidates[0].display_name, "99");
    }

    #[test]
    fn channel_overflow_is_invalid_input() {
        let r = RegionIndex::new(2).unwrap();
        let votes = RegionVotes { region_index: r, records: vec![rec(1, i64::MAX, 1)], sha256: None };
        let err = build_region_input(r, 3, &votes, &directory()).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidInput);
        assert_eq!(err.region_index, r);
    }

    #[test]
    fn negative_channel_is_invalid_input_even_if_sum_is_positive() {
        let r = RegionIndex::new(3).unwrap();
        let votes = RegionVotes { region_index: r, records: vec![rec(2, 40, 0), rec(1, -500, 1000)], sha256: None };
        let err = build_region_input(r, 3, &votes, &directory()).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidInput);
        assert_eq!(err.region_index, r);
        assert!(err.message.contains("negative urban vote count -500"));
    }
}
