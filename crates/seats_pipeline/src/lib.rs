//! seats_pipeline — load → build inputs → allocate per region → aggregate → result id.
//!
//! I/O (files, JSON, hashing) goes through `seats_io`; seat math through `seats_algo`.
//! The pipeline itself never aborts on a single bad region: failures are
//! recorded and the national total is built from the regions that succeeded.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use seats_algo::{aggregate_national, NationalOutcome, RegionResult};
use seats_core::{
    entities::CandidateDirectory,
    ids::{RegionIndex, ResultId},
    variables::{self, ElectionConfig, TiePolicy},
};
use seats_io::{
    config::config_digest,
    loader::{self, load_committees},
    source::{DirSource, RegionSource},
    IoError,
};

pub mod allocate;
pub mod build_result;
pub mod input;

pub use allocate::{allocate_all, RegionRun};
pub use input::build_region_input;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io: {0}")]
    Io(#[from] IoError),

    #[error("config: {0}")]
    Config(String),

    #[error("worker: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Allocate regions on scoped worker threads.
    pub parallel: bool,
}

/// SHA-256 digests of the run's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDigests {
    /// Canonical JSON of the effective config (after overrides).
    pub config_sha256: String,
    /// Raw committees file; absent for in-memory directories.
    pub committees_sha256: Option<String>,
    /// Raw region files that were read.
    pub regions: BTreeMap<RegionIndex, String>,
}

/// Everything a run needs, already loaded and validated.
#[derive(Debug)]
pub struct PipelineCtx<S> {
    pub config: ElectionConfig,
    pub directory: CandidateDirectory,
    pub source: S,
    pub digests: InputDigests,
    pub options: RunOptions,
}

impl<S: RegionSource> PipelineCtx<S> {
    /// Build a context from already-loaded parts (e.g. a `MemorySource`).
    pub fn new(
        config: ElectionConfig,
        directory: CandidateDirectory,
        source: S,
        options: RunOptions,
    ) -> Result<Self, PipelineError> {
        variables::validate_domains(&config).map_err(|e| PipelineError::Config(e.to_string()))?;
        let digests = InputDigests { config_sha256: config_digest(&config)?, ..InputDigests::default() };
        Ok(Self { config, directory, source, digests, options })
    }
}

/// Load committees from `data_dir` and attach a `DirSource` over its regions.
pub fn load_dir_ctx(
    data_dir: &Path,
    config: ElectionConfig,
    options: RunOptions,
) -> Result<PipelineCtx<DirSource>, PipelineError> {
    variables::validate_domains(&config).map_err(|e| PipelineError::Config(e.to_string()))?;
    let source = DirSource::new(data_dir)?;
    let committees = load_committees(&loader::committees_path(data_dir), &config)?;
    let digests = InputDigests {
        config_sha256: config_digest(&config)?,
        committees_sha256: Some(committees.sha256),
        regions: BTreeMap::new(),
    };
    Ok(PipelineCtx { config, directory: committees.directory, source, digests, options })
}

/// Tie policy in effect for a run (seed present iff random).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyEcho {
    pub tie_policy: TiePolicy,
    pub tie_seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    /// One entry per configured region, in region order.
    pub regions: Vec<RegionResult>,
    pub national: NationalOutcome,
    pub digests: InputDigests,
    pub policy: PolicyEcho,
    pub result_id: ResultId,
}

impl PipelineOutputs {
    /// True when no region could be allocated.
    pub fn all_failed(&self) -> bool {
        !self.regions.is_empty() && self.regions.iter().all(Result::is_err)
    }
}

/// Run the pipeline over a prepared context.
pub fn run_with_ctx<S: RegionSource>(ctx: &PipelineCtx<S>) -> Result<PipelineOutputs, PipelineError> {
    let cfg = &ctx.config;
    info!(
        regions = cfg.region_count(),
        seats = cfg.total_seats(),
        tie_policy = cfg.tie_policy.as_token(),
        winners = cfg.with_winners,
        parallel = ctx.options.parallel,
        "allocation run started"
    );

    let runs = allocate_all(cfg, &ctx.directory, &ctx.source, ctx.options.parallel)?;

    let mut digests = ctx.digests.clone();
    let mut regions = Vec::with_capacity(runs.len());
    for run in runs {
        if let Some(sha) = run.input_sha256 {
            digests.regions.insert(run.region_index, sha);
        }
        regions.push(run.result);
    }

    let national = aggregate_national(&regions);
    let result_id = build_result::compute_result_id(&regions, &national)?;

    info!(
        counted = national.regions_counted.len(),
        failed = national.failed_regions.len(),
        seats = national.seats_allocated,
        result_id = %result_id,
        "allocation run finished"
    );

    let tie_seed = match cfg.tie_policy {
        TiePolicy::Random => cfg.tie_seed,
        _ => None,
    };
    Ok(PipelineOutputs {
        regions,
        national,
        digests,
        policy: PolicyEcho { tie_policy: cfg.tie_policy, tie_seed },
        result_id,
    })
}

/// Convenience entry: load `config_path` and `data_dir`, then run.
pub fn run_from_dir(
    data_dir: &Path,
    config_path: &Path,
    options: RunOptions,
) -> Result<PipelineOutputs, PipelineError> {
    let config = seats_io::config::load_config(config_path)?;
    let ctx = load_dir_ctx(data_dir, config, options)?;
    run_with_ctx(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seats_core::{entities::VoteRecord, ids::{CandidateId, GroupingName}};
    use seats_io::source::MemorySource;
    use std::fs;

    fn r(n: u32) -> RegionIndex { RegionIndex::new(n).unwrap() }

    fn rec(id: i64, votes: i64) -> VoteRecord {
        VoteRecord { candidate_id: CandidateId::new(id), urban: votes, rural: 0, maritime: 0, overseas: 0 }
    }

    #[test]
    fn memory_run_aggregates_and_ids_are_stable() {
        let mut d = CandidateDirectory::new();
        d.insert(CandidateId::new(1), GroupingName::new("A").unwrap(), "a1");
        d.insert(CandidateId::new(2), GroupingName::new("B").unwrap(), "b1");
        let src = MemorySource::new()
            .with_region(r(1), vec![rec(1, 100), rec(2, 50)])
            .with_region(r(2), vec![rec(1, 10), rec(2, 40)]);
        let ctx = PipelineCtx::new(ElectionConfig::new(vec![4, 2]), d, src, RunOptions::default()).unwrap();

        let out = run_with_ctx(&ctx).unwrap();
        let a = GroupingName::new("A").unwrap();
        let b = GroupingName::new("B").unwrap();
        assert_eq!(out.national.seats_by_grouping[&a], 3);
        assert_eq!(out.national.seats_by_grouping[&b], 3);
        assert_eq!(out.national.seats_allocated, 6);
        assert!(out.digests.committees_sha256.is_none());
        assert!(!out.all_failed());

        let again = run_with_ctx(&ctx).unwrap();
        assert_eq!(out.result_id, again.result_id);
    }

    #[test]
    fn random_without_seed_is_rejected() {
        let mut cfg = ElectionConfig::new(vec![1]);
        cfg.tie_policy = TiePolicy::Random;
        let err = PipelineCtx::new(cfg, CandidateDirectory::new(), MemorySource::new(), RunOptions::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn dir_run_records_digests_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("regions")).unwrap();
        fs::write(
            dir.path().join("committees.json"),
            r#"{"parties":[{"name":"Komitet A","candidates":[{"id":1,"name":"Anna"}]},{"name":"Komitet B","candidates":[{"id":2,"name":"Bartek"}]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("regions/1.json"),
            r#"{"persons":[{"id":1,"vote_count":{"urban":30}},{"id":2,"vote_count":{"rural":20}}]}"#,
        )
        .unwrap();
        let cfg_path = dir.path().join("config.json");
        fs::write(&cfg_path, r#"{"seats_per_region":[3,2],"aliases":{"Komitet A":"A"}}"#).unwrap();

        let out = run_from_dir(dir.path(), &cfg_path, RunOptions::default()).unwrap();
        assert!(out.digests.committees_sha256.is_some());
        assert_eq!(out.digests.regions.len(), 1);
        assert_eq!(out.national.failed_regions.len(), 1);
        assert_eq!(out.national.failed_regions[0].region_index, r(2));
        assert_eq!(out.national.seats_by_grouping[&GroupingName::new("A").unwrap()], 2);
        assert_eq!(out.national.seats_by_grouping[&GroupingName::new("Komitet B").unwrap()], 1);
    }

    #[test]
    fn all_failed_when_no_region_has_data() {
        let ctx = PipelineCtx::new(
            ElectionConfig::new(vec![2, 2]),
            CandidateDirectory::new(),
            MemorySource::new(),
            RunOptions::default(),
        )
        .unwrap();
        let out = run_with_ctx(&ctx).unwrap();
        assert!(out.all_failed());
        assert_eq!(out.national.seats_allocated, 0);
    }
}
