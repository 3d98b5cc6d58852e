//! SHA-256 digests and the result id.
//!
//! - `sha256_hex` hashes raw bytes (input files as read).
//! - `sha256_canonical` hashes the canonical JSON of a serializable value.
//! - `result_id` is `RES:<hex>` over the canonical allocation data.
//!
//! Hex digests are lowercase.

use serde::Serialize;
use sha2::{Digest, Sha256};

use seats_core::ids::ResultId;

use crate::{canonical_json, IoResult};

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of `value`.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    let bytes = canonical_json::to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// `RES:<hex>` over the canonical JSON bytes of `value`.
pub fn result_id<T: Serialize>(value: &T) -> IoResult<ResultId> {
    let hex = sha256_canonical(value)?;
    Ok(ResultId::from_hex(&hex)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_vector_lowercase() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn canonical_hash_ignores_key_order() {
        #[derive(Serialize)]
        struct Seats { ko: u32, pis: u32 }
        let a = sha256_canonical(&Seats { ko: 10, pis: 7 }).unwrap();
        let b = sha256_canonical(&json!({"pis": 7, "ko": 10})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn result_id_has_prefix() {
        let id = result_id(&json!({"regions": []})).unwrap();
        assert!(id.as_str().starts_with("RES:"));
        assert_eq!(id.as_str().len(), 4 + 64);
    }
}
