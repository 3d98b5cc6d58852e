//! Report data model + mapper from pipeline outputs.
//! No I/O, no recomputation. Ordering is fixed here so renderers only walk it.

use seats_algo::{RegionOutcome, RegionResult};
use seats_core::determinism::sort_desc_by_count;
use seats_pipeline::PipelineOutputs;

use crate::ReportError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportModel {
    /// Every configured region in region order, failed ones included.
    pub regions: Vec<RegionBlock>,
    pub national: Vec<NationalRow>,
    pub failed: Vec<FailedRow>,
    pub integrity: IntegrityBlock,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionBlock {
    pub index: u32,
    /// `None` when the region failed.
    pub allocation: Option<RegionAllocation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionAllocation {
    pub seat_count: u32,
    /// Descending seats, grouping name ascending on ties.
    pub groupings: Vec<GroupingRow>,
    pub last_seat_tie: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupingRow {
    pub name: String,
    pub votes: u64,
    pub seats: u32,
    pub winners: Option<Vec<WinnerRow>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinnerRow {
    pub candidate_id: i64,
    pub name: String,
    pub votes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NationalRow {
    pub name: String,
    pub seats: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedRow {
    pub index: u32,
    pub kind: &'static str,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrityBlock {
    pub result_id: String,
    pub config_sha256: String,
    pub committees_sha256: Option<String>,
    /// `(region index, sha256)` ascending by index.
    pub region_sha256: Vec<(u32, String)>,
    pub tie_policy: &'static str,
    pub tie_seed: Option<u64>,
    pub seats_allocated: u64,
}

/// Build the report model from a finished run.
pub fn build_model(out: &PipelineOutputs) -> Result<ReportModel, ReportError> {
    let regions = out.regions.iter().map(region_block).collect::<Result<Vec<_>, _>>()?;

    let national = out
        .national
        .ranking
        .iter()
        .map(|(g, n)| NationalRow { name: g.to_string(), seats: *n })
        .collect();

    let failed = out
        .national
        .failed_regions
        .iter()
        .map(|f| FailedRow { index: f.region_index.get(), kind: f.kind.as_token(), reason: f.message.clone() })
        .collect();

    let integrity = IntegrityBlock {
        result_id: out.result_id.to_string(),
        config_sha256: out.digests.config_sha256.clone(),
        committees_sha256: out.digests.committees_sha256.clone(),
        region_sha256: out.digests.regions.iter().map(|(r, h)| (r.get(), h.clone())).collect(),
        tie_policy: out.policy.tie_policy.as_token(),
        tie_seed: out.policy.tie_seed,
        seats_allocated: out.national.seats_allocated,
    };

    Ok(ReportModel { regions, national, failed, integrity })
}

fn region_block(r: &RegionResult) -> Result<RegionBlock, ReportError> {
    match r {
        Ok(o) => Ok(RegionBlock { index: o.region_index.get(), allocation: Some(region_allocation(o)?) }),
        Err(f) => Ok(RegionBlock { index: f.region_index.get(), allocation: None }),
    }
}

fn region_allocation(o: &RegionOutcome) -> Result<RegionAllocation, ReportError> {
    let mut groupings = Vec::with_capacity(o.seats_by_grouping.len());
    for (g, seats) in sort_desc_by_count(&o.seats_by_grouping) {
        let votes = *o
            .votes_by_grouping
            .get(&g)
            .ok_or(ReportError::Inconsistent("seats for a grouping without votes"))?;
        let winners = match &o.winners_by_grouping {
            Some(w) => Some(
                w.get(&g)
                    .map(|list| {
                        list.iter()
                            .map(|x| WinnerRow {
                                candidate_id: x.candidate_id.get(),
                                name: x.display_name.clone(),
                                votes: x.votes,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            None => None,
        };
        groupings.push(GroupingRow { name: g.to_string(), votes, seats, winners });
    }
    Ok(RegionAllocation { seat_count: o.seat_count, groupings, last_seat_tie: o.last_seat_tie })
}
