//! seats_core — Core types, configuration domains, ordering helpers, and deterministic RNG.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`seats_io`, `seats_algo`, `seats_pipeline`, `seats_report`, `seats_cli`).
//!
//! - Identifiers: `CandidateId`, `RegionIndex`, `GroupingName`, `ResultId`
//! - Entities: `VoteRecord`, `CandidateEntry`, `RegionInput`, `CandidateDirectory`
//! - Configuration: `ElectionConfig`, `TiePolicy`
//! - Deterministic ordering helpers
//! - Seedable RNG (ChaCha20) for **ties only**
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId,
        InvalidRegionIndex,
        InvalidGroupingName,
        EmptySeatTable,
        MissingTieSeed,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::InvalidRegionIndex => write!(f, "region index must be >= 1"),
                CoreError::InvalidGroupingName => write!(f, "grouping name must not be blank"),
                CoreError::EmptySeatTable => write!(f, "seats_per_region must list at least one region"),
                CoreError::MissingTieSeed => write!(f, "tie_policy \"random\" requires tie_seed"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod ids;
pub mod entities;
pub mod determinism;
pub mod rng;
pub mod variables;

pub use errors::CoreError;
