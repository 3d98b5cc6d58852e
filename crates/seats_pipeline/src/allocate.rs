//! ALLOCATE stage: fetch, build, and allocate every configured region.
//!
//! Regions are independent. In parallel mode they are split into contiguous
//! chunks handled by scoped worker threads; results are written back by
//! region position, so the returned vector is always in region order.
//!
//! Under `TiePolicy::Random` each region gets its own `TieRng` derived from
//! `(tie_seed, region_index)`, so the draws do not depend on scheduling.

use std::thread;

use tracing::{debug, warn};

use seats_algo::{allocate_region, AllocOptions, FailureKind, RegionFailure, RegionResult};
use seats_core::{
    entities::CandidateDirectory,
    ids::RegionIndex,
    rng::TieRng,
    variables::{ElectionConfig, TiePolicy},
};
use seats_io::source::{RegionSource, RegionVotes};

use crate::{input::build_region_input, PipelineError};

/// A region's result plus the digest of its raw input (if the source read one).
#[derive(Debug, Clone)]
pub struct RegionRun {
    pub region_index: RegionIndex,
    pub result: RegionResult,
    pub input_sha256: Option<String>,
}

/// Allocate all regions of `cfg` in region order.
pub fn allocate_all<S: RegionSource + ?Sized>(
    cfg: &ElectionConfig,
    directory: &CandidateDirectory,
    source: &S,
    parallel: bool,
) -> Result<Vec<RegionRun>, PipelineError> {
    let jobs: Vec<(RegionIndex, i64)> = cfg.regions().collect();
    if !parallel || jobs.len() < 2 {
        return Ok(jobs.iter().map(|&(r, n)| allocate_one(cfg, directory, source, r, n)).collect());
    }

    let workers = thread::available_parallelism().map_or(1, |n| n.get()).min(jobs.len());
    let chunk = jobs.len().div_ceil(workers);
    debug!(regions = jobs.len(), workers, "allocating in parallel");

    let mut slots: Vec<Option<RegionRun>> = vec![None; jobs.len()];
    thread::scope(|scope| -> Result<(), PipelineError> {
        let handles: Vec<_> = jobs
            .chunks(chunk)
            .map(|part| {
                scope.spawn(move || {
                    part.iter()
                        .map(|&(r, n)| allocate_one(cfg, directory, source, r, n))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut panicked = false;
        for h in handles {
            match h.join() {
                Ok(done) => {
                    for run in done {
                        let pos = run.region_index.position();
                        slots[pos] = Some(run);
                    }
                }
                Err(_) => panicked = true,
            }
        }
        if panicked {
            return Err(PipelineError::Worker("region worker panicked".into()));
        }
        Ok(())
    })?;

    slots
        .into_iter()
        .zip(&jobs)
        .map(|(slot, (r, _))| slot.ok_or_else(|| PipelineError::Worker(format!("region {r} produced no result"))))
        .collect()
}

/// Fetch, build, and allocate one region. Never fails the run; problems
/// become a `RegionFailure`.
pub fn allocate_one<S: RegionSource + ?Sized>(
    cfg: &ElectionConfig,
    directory: &CandidateDirectory,
    source: &S,
    region: RegionIndex,
    seat_count: i64,
) -> RegionRun {
    let votes = match source.fetch_region(region) {
        Ok(v) => v,
        Err(e) => {
            warn!(region = %region, error = %e, "skipping region: data unavailable");
            return RegionRun {
                region_index: region,
                result: Err(RegionFailure {
                    region_index: region,
                    kind: FailureKind::DataUnavailable,
                    message: e.to_string(),
                }),
                input_sha256: None,
            };
        }
    };
    let input_sha256 = votes.sha256.clone();
    RegionRun { region_index: region, result: allocate_votes(cfg, directory, region, seat_count, &votes), input_sha256 }
}

fn allocate_votes(
    cfg: &ElectionConfig,
    directory: &CandidateDirectory,
    region: RegionIndex,
    seat_count: i64,
    votes: &RegionVotes,
) -> RegionResult {
    let input = build_region_input(region, seat_count, votes, directory).map_err(|f| {
        warn!(region = %region, error = %f.message, "skipping region: invalid input");
        f
    })?;

    let opts = AllocOptions { with_winners: cfg.with_winners, tie_policy: cfg.tie_policy };
    let mut rng = match (cfg.tie_policy, cfg.tie_seed) {
        (TiePolicy::Random, Some(seed)) => Some(TieRng::for_region(seed, region)),
        _ => None,
    };

    let outcome = allocate_region(&input, opts, rng.as_mut()).map_err(|e| {
        warn!(region = %region, error = %e, "skipping region: invalid input");
        RegionFailure { region_index: region, kind: FailureKind::InvalidInput, message: e.to_string() }
    })?;

    if let Some(winners) = &outcome.winners_by_grouping {
        for (grouping, list) in winners {
            let seats = outcome.seats_by_grouping.get(grouping).copied().unwrap_or(0);
            if (list.len() as u32) < seats {
                warn!(region = %region, grouping = %grouping, seats, candidates = list.len(), "grouping won more seats than it has candidates");
            }
        }
    }
    if outcome.last_seat_tie {
        debug!(region = %region, policy = cfg.tie_policy.as_token(), "last seat decided among equal quotients");
    }
    debug!(region = %region, seats = outcome.seat_count, groupings = outcome.seats_by_grouping.len(), "region allocated");
    Ok(outcome)
}
