//! Loader: read the decoded committees and per-region vote files from a local
//! data directory and turn them into core entities.
//!
//! Layout:
//! - `<dir>/committees.json` — parties → candidates `{id, name}`
//! - `<dir>/regions/<index>.json` — persons `{id, vote_count{urban, rural, maritime, overseas}}`
//!
//! No network I/O. Every read is capped at `MAX_INPUT_BYTES`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use seats_core::{
    entities::{CandidateDirectory, VoteRecord},
    ids::{CandidateId, RegionIndex},
    variables::ElectionConfig,
};

use crate::{hasher, looks_like_url_strict, IoError, IoResult};

/// Read cap for any single input file (64 MiB).
pub const MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

pub const COMMITTEES_FILE: &str = "committees.json";
pub const REGIONS_DIR: &str = "regions";

// ----------------------------- Wire-facing types -----------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitteesFile {
    pub parties: Vec<PartyRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyRecord {
    /// Full registered committee name; mapped through the alias table.
    pub name: String,
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionFile {
    #[serde(default)]
    pub persons: Vec<PersonRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: CandidateId,
    #[serde(default)]
    pub vote_count: ChannelCounts,
}

/// Votes per counting channel. Missing channels count as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCounts {
    pub urban: i64,
    pub rural: i64,
    pub maritime: i64,
    pub overseas: i64,
}

impl PersonRecord {
    pub fn to_vote_record(&self) -> VoteRecord {
        let c = self.vote_count;
        VoteRecord {
            candidate_id: self.id,
            urban: c.urban,
            rural: c.rural,
            maritime: c.maritime,
            overseas: c.overseas,
        }
    }
}

/// Membership and names built from the committees file, plus its digest.
#[derive(Debug, Clone)]
pub struct Committees {
    pub directory: CandidateDirectory,
    pub sha256: String,
}

// ----------------------------- Reads -----------------------------

/// Read `path` fully, refusing URLs and anything above `MAX_INPUT_BYTES`.
pub fn read_bounded(path: &Path) -> IoResult<Vec<u8>> {
    let shown = path.display().to_string();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Remote(shown));
    }
    let f = File::open(path).map_err(|e| IoError::Path(format!("{shown}: {e}")))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("{shown}: {e}")))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::TooLarge { path: shown, limit: MAX_INPUT_BYTES });
    }
    Ok(buf)
}

/// Read and decode a JSON file; returns the value and the SHA-256 of the raw bytes.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<(T, String)> {
    let bytes = read_bounded(path)?;
    let digest = hasher::sha256_hex(&bytes);
    let value = serde_json::from_slice(&bytes).map_err(|e| IoError::Json {
        pointer: path.display().to_string(),
        msg: e.to_string(),
    })?;
    Ok((value, digest))
}

pub fn committees_path(data_dir: &Path) -> PathBuf {
    data_dir.join(COMMITTEES_FILE)
}

pub fn region_path(data_dir: &Path, region: RegionIndex) -> PathBuf {
    data_dir.join(REGIONS_DIR).join(format!("{}.json", region.get()))
}

/// Build the candidate directory from a committees file.
///
/// Each party name goes through `cfg`'s alias table. A candidate id listed
/// under more than one party keeps the last listing.
pub fn load_committees(path: &Path, cfg: &ElectionConfig) -> IoResult<Committees> {
    let (file, sha256): (CommitteesFile, String) = read_json(path)?;
    let directory = build_directory(&file, cfg)?;
    debug!(
        parties = file.parties.len(),
        candidates = directory.len(),
        "loaded committees"
    );
    Ok(Committees { directory, sha256 })
}

pub fn build_directory(file: &CommitteesFile, cfg: &ElectionConfig) -> IoResult<CandidateDirectory> {
    let mut dir = CandidateDirectory::new();
    let mut first_party: BTreeMap<CandidateId, &str> = BTreeMap::new();
    for party in &file.parties {
        let grouping = cfg
            .resolve_grouping(&party.name)
            .map_err(|e| IoError::Invalid(format!("party {:?}: {e}", party.name)))?;
        for c in &party.candidates {
            if let Some(prev) = first_party.insert(c.id, &party.name) {
                if prev != party.name {
                    warn!(candidate = %c.id, first = prev, second = %party.name, "candidate listed under two parties");
                }
            }
            dir.insert(c.id, grouping.clone(), c.name.clone());
        }
    }
    Ok(dir)
}

/// Read one region file into vote records (file order kept).
pub fn load_region_file(path: &Path) -> IoResult<(Vec<VoteRecord>, String)> {
    let (file, sha256): (RegionFile, String) = read_json(path)?;
    let records = file.persons.iter().map(PersonRecord::to_vote_record).collect();
    Ok((records, sha256))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, body: &str) -> PathBuf {
        let p = dir.join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&p, body).unwrap();
        p
    }

    const COMMITTEES: &str = r#"{"parties":[
        {"name":"KOMITET WYBORCZY NOWA LEWICA","candidates":[{"id":1,"name":"Anna Nowak"},{"id":2,"name":"Jan Kowalski"}]},
        {"name":"Inny Komitet","candidates":[{"id":3,"name":"Ewa Zielinska"}]}
    ]}"#;

    #[test]
    fn committees_resolve_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(dir.path(), COMMITTEES_FILE, COMMITTEES);
        let mut cfg = ElectionConfig::new(vec![1]);
        cfg.aliases.insert("KOMITET WYBORCZY NOWA LEWICA".into(), "Lewica".into());

        let c = load_committees(&p, &cfg).unwrap();
        assert_eq!(c.directory.len(), 3);
        assert_eq!(c.directory.grouping_of(CandidateId::new(2)).unwrap().as_str(), "Lewica");
        assert_eq!(c.directory.grouping_of(CandidateId::new(3)).unwrap().as_str(), "Inny Komitet");
        assert_eq!(c.directory.name_of(CandidateId::new(1)), Some("Anna Nowak"));
        assert_eq!(c.sha256, hasher::sha256_hex(COMMITTEES.as_bytes()));
    }

    #[test]
    fn region_file_missing_channels_are_zero() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            dir.path(),
            "regions/1.json",
            r#"{"persons":[{"id":1,"vote_count":{"urban":10,"rural":5}},{"id":2}]}"#,
        );
        let (records, _) = load_region_file(&p).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].total(), Some(15));
        assert_eq!(records[1].total(), Some(0));
    }

    #[test]
    fn rejects_urls_and_bad_json() {
        let err = read_bounded(Path::new("https://example.org/committees.json")).unwrap_err();
        assert!(matches!(err, IoError::Remote(_)));

        let dir = tempfile::tempdir().unwrap();
        let p = write(dir.path(), "regions/2.json", "{ not json");
        let err = load_region_file(&p).unwrap_err();
        match err {
            IoError::Json { pointer, .. } => assert!(pointer.ends_with("2.json")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn region_paths_are_one_based() {
        let p = region_path(Path::new("data"), RegionIndex::new(7).unwrap());
        assert_eq!(p, Path::new("data").join("regions").join("7.json"));
    }
}
