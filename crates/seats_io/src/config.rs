//! Election configuration loading.

use std::path::Path;

use seats_core::variables::{self, ElectionConfig};

use crate::{hasher, loader, IoError, IoResult};

/// Load `ElectionConfig` from a local JSON file and check its domains.
pub fn load_config(path: &Path) -> IoResult<ElectionConfig> {
    let (cfg, _raw_sha256): (ElectionConfig, String) = loader::read_json(path)?;
    variables::validate_domains(&cfg)
        .map_err(|e| IoError::Invalid(format!("{}: {e}", path.display())))?;
    Ok(cfg)
}

/// Digest of the effective configuration (after CLI overrides), over canonical JSON.
pub fn config_digest(cfg: &ElectionConfig) -> IoResult<String> {
    hasher::sha256_canonical(cfg)
}
