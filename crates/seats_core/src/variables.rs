//! Election configuration: per-region seat table, grouping aliases, tie policy.
//!
//! The seat table and alias table are plain data so that the allocator can be
//! exercised with any number of regions and any grouping names.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{GroupingName, RegionIndex};

/// Define an enum with explicit wire tokens (serde derives are feature-aware).
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident => { $($(#[$vmeta:meta])* $variant:ident = $token:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub fn as_token(self) -> &'static str {
                match self { $($name::$variant => $token,)+ }
            }
        }

        impl core::str::FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

wire_enum!(
    /// How equal quotients (and equal candidate vote counts) are ordered.
    TiePolicy => {
        /// Grouping name ascending, then divisor index; candidates by id ascending.
        DeterministicOrder = "deterministic_order",
        /// First appearance in the region's candidate list; candidates keep input order.
        FirstSeen          = "first_seen",
        /// Seeded shuffle of the tied run at the last seat; candidates by id ascending.
        Random             = "random",
    }
);

impl Default for TiePolicy {
    fn default() -> Self { TiePolicy::DeterministicOrder }
}

/// Upper bound for one region's seat count. The largest real assemblies
/// elect a few hundred members per district at most.
pub const MAX_SEATS_PER_REGION: i64 = 10_000;

/// Run configuration handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ElectionConfig {
    /// Seats per region, in region order. Signed so that a negative entry is
    /// reported by the allocator for that region only.
    pub seats_per_region: Vec<i64>,
    /// Committee name → short display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub aliases: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tie_policy: TiePolicy,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub tie_seed: Option<u64>,
    /// Produce the ordered winner list per grouping.
    #[cfg_attr(feature = "serde", serde(default))]
    pub with_winners: bool,
}

impl ElectionConfig {
    pub fn new(seats_per_region: Vec<i64>) -> Self {
        Self { seats_per_region, ..Self::default() }
    }

    pub fn region_count(&self) -> usize { self.seats_per_region.len() }

    /// `(RegionIndex, seat_count)` pairs in region order.
    pub fn regions(&self) -> impl Iterator<Item = (RegionIndex, i64)> + '_ {
        self.seats_per_region
            .iter()
            .enumerate()
            .filter_map(|(i, &n)| RegionIndex::from_position(i).ok().map(|r| (r, n)))
    }

    /// Sum of the non-negative seat table entries.
    pub fn total_seats(&self) -> u64 {
        self.seats_per_region.iter().filter(|&&n| n > 0).map(|&n| n as u64).sum()
    }

    /// Map a committee name to its display grouping (alias if one is configured).
    pub fn resolve_grouping(&self, committee: &str) -> Result<GroupingName, CoreError> {
        match self.aliases.get(committee) {
            Some(alias) if !alias.is_empty() => GroupingName::new(alias.clone()),
            _ => GroupingName::new(committee),
        }
    }
}

/// Domain checks performed once after loading.
pub fn validate_domains(cfg: &ElectionConfig) -> Result<(), CoreError> {
    if cfg.seats_per_region.is_empty() {
        return Err(CoreError::EmptySeatTable);
    }
    if u32::try_from(cfg.seats_per_region.len()).is_err() {
        return Err(CoreError::DomainOutOfRange("seats_per_region"));
    }
    // Negative entries stay: the allocator rejects that region alone.
    if cfg.seats_per_region.iter().any(|&n| n > MAX_SEATS_PER_REGION) {
        return Err(CoreError::DomainOutOfRange("seats_per_region"));
    }
    if cfg.tie_policy == TiePolicy::Random && cfg.tie_seed.is_none() {
        return Err(CoreError::MissingTieSeed);
    }
    if cfg.aliases.values().any(|a| a.trim().is_empty()) {
        return Err(CoreError::InvalidGroupingName);
    }
    Ok(())
}
