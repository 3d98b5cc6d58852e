//! Region vote sources.
//!
//! `RegionSource` is the seam between retrieval and allocation. The pipeline
//! only sees decoded `VoteRecord`s; where they come from is up to the source.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use seats_core::{entities::VoteRecord, ids::RegionIndex};

use crate::{loader, looks_like_url_strict, IoError, IoResult};

/// Decoded votes for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionVotes {
    pub region_index: RegionIndex,
    pub records: Vec<VoteRecord>,
    /// SHA-256 of the raw input, when the source read one.
    pub sha256: Option<String>,
}

/// A region's data could not be obtained or decoded.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("region {region}: no vote data ({reason})")]
    Missing { region: RegionIndex, reason: String },

    #[error("region {region}: {source}")]
    Read {
        region: RegionIndex,
        #[source]
        source: IoError,
    },
}

pub trait RegionSource: Sync {
    fn fetch_region(&self, region: RegionIndex) -> Result<RegionVotes, DataError>;
}

/// Reads `<root>/regions/<index>.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> IoResult<Self> {
        let root = root.into();
        let shown = root.display().to_string();
        if looks_like_url_strict(&shown) {
            return Err(IoError::Remote(shown));
        }
        if !root.is_dir() {
            return Err(IoError::Path(format!("{shown}: not a directory")));
        }
        Ok(Self { root })
    }
}

impl RegionSource for DirSource {
    fn fetch_region(&self, region: RegionIndex) -> Result<RegionVotes, DataError> {
        let path = loader::region_path(&self.root, region);
        if !path.is_file() {
            return Err(DataError::Missing {
                region,
                reason: format!("{} not found", path.display()),
            });
        }
        let (records, sha256) =
            loader::load_region_file(&path).map_err(|source| DataError::Read { region, source })?;
        Ok(RegionVotes { region_index: region, records, sha256: Some(sha256) })
    }
}

/// In-memory source for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    regions: BTreeMap<RegionIndex, Vec<VoteRecord>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: RegionIndex, records: Vec<VoteRecord>) {
        self.regions.insert(region, records);
    }

    pub fn with_region(mut self, region: RegionIndex, records: Vec<VoteRecord>) -> Self {
        self.insert(region, records);
        self
    }
}

impl RegionSource for MemorySource {
    fn fetch_region(&self, region: RegionIndex) -> Result<RegionVotes, DataError> {
        match self.regions.get(&region) {
            Some(records) => Ok(RegionVotes { region_index: region, records: records.clone(), sha256: None }),
            None => Err(DataError::Missing { region, reason: "not registered".to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seats_core::ids::CandidateId;
    use std::fs;

    fn r(n: u32) -> RegionIndex {
        RegionIndex::new(n).unwrap()
    }

    #[test]
    fn dir_source_reads_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("regions")).unwrap();
        fs::write(
            dir.path().join("regions/1.json"),
            r#"{"persons":[{"id":4,"vote_count":{"urban":3,"rural":1,"maritime":0,"overseas":2}}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("regions/3.json"), r#"{"persons": 5}"#).unwrap();

        let src = DirSource::new(dir.path()).unwrap();
        let got = src.fetch_region(r(1)).unwrap();
        assert_eq!(got.records[0].candidate_id, CandidateId::new(4));
        assert_eq!(got.records[0].total(), Some(6));
        assert!(got.sha256.is_some());

        let missing = src.fetch_region(r(2)).unwrap_err();
        assert!(matches!(missing, DataError::Missing { region, .. } if region == r(2)));

        let bad = src.fetch_region(r(3)).unwrap_err();
        assert!(matches!(bad, DataError::Read { .. }));
    }

    #[test]
    fn dir_source_refuses_urls() {
        assert!(matches!(DirSource::new("http://pkw.example/data"), Err(IoError::Remote(_))));
    }

    #[test]
    fn memory_source_returns_clones() {
        let rec = VoteRecord { candidate_id: CandidateId::new(1), urban: 1, rural: 0, maritime: 0, overseas: 0 };
        let src = MemorySource::new().with_region(r(1), vec![rec.clone()]);
        assert_eq!(src.fetch_region(r(1)).unwrap().records, vec![rec]);
        assert!(src.fetch_region(r(2)).is_err());
    }
}
