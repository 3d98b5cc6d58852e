//! BUILD_RESULT stage: the `RES:` id over the canonical allocation data.
//!
//! The hashed view holds allocation data only (per-region seats and winner ids,
//! the national ranking, failed region indices). Input digests and display
//! names are excluded, so renaming a candidate does not change the id.

use std::collections::BTreeMap;

use serde::Serialize;

use seats_algo::{NationalOutcome, RegionResult};
use seats_core::ids::{GroupingName, ResultId};
use seats_io::hasher;

use crate::PipelineError;

#[derive(Serialize)]
struct RegionView<'a> {
    region: u32,
    seat_count: u32,
    seats: &'a BTreeMap<GroupingName, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winners: Option<BTreeMap<&'a GroupingName, Vec<i64>>>,
    last_seat_tie: bool,
}

#[derive(Serialize)]
struct FailedView<'a> {
    region: u32,
    kind: &'a str,
}

#[derive(Serialize)]
struct AllocationView<'a> {
    regions: Vec<RegionView<'a>>,
    national: Vec<(&'a GroupingName, u64)>,
    failed_regions: Vec<FailedView<'a>>,
}

pub fn compute_result_id(
    regions: &[RegionResult],
    national: &NationalOutcome,
) -> Result<ResultId, PipelineError> {
    let view = AllocationView {
        regions: regions
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|o| RegionView {
                region: o.region_index.get(),
                seat_count: o.seat_count,
                seats: &o.seats_by_grouping,
                winners: o.winners_by_grouping.as_ref().map(|w| {
                    w.iter()
                        .map(|(g, list)| (g, list.iter().map(|x| x.candidate_id.get()).collect()))
                        .collect()
                }),
                last_seat_tie: o.last_seat_tie,
            })
            .collect(),
        national: national.ranking.iter().map(|(g, n)| (g, *n)).collect(),
        failed_regions: national
            .failed_regions
            .iter()
            .map(|f| FailedView { region: f.region_index.get(), kind: f.kind.as_token() })
            .collect(),
    };
    Ok(hasher::result_id(&view)?)
}
