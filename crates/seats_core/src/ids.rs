//! Newtypes and parsers for engine identifiers.

use crate::errors::CoreError;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn is_lower_hex_len(s: &str, n: usize) -> bool {
    s.len() == n && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Opaque numeric candidate identifier, as issued by the electoral commission.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CandidateId(i64);

impl CandidateId {
    pub const fn new(raw: i64) -> Self { Self(raw) }
    pub const fn get(self) -> i64 { self.0 }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CandidateId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|_| CoreError::InvalidId)
    }
}

/// 1-based electoral region index. Region `n` uses entry `n-1` of the seat table.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct RegionIndex(u32);

impl RegionIndex {
    pub fn new(n: u32) -> Result<Self, CoreError> {
        if n == 0 { Err(CoreError::InvalidRegionIndex) } else { Ok(Self(n)) }
    }

    /// Index for the `i`-th (0-based) entry of an ordered seat table.
    pub fn from_position(i: usize) -> Result<Self, CoreError> {
        let n = u32::try_from(i).ok().and_then(|i| i.checked_add(1)).ok_or(CoreError::InvalidRegionIndex)?;
        Self::new(n)
    }

    pub fn get(self) -> u32 { self.0 }

    /// 0-based position in the seat table.
    pub fn position(self) -> usize { (self.0 - 1) as usize }
}

impl TryFrom<u32> for RegionIndex {
    type Error = CoreError;
    fn try_from(n: u32) -> Result<Self, Self::Error> { Self::new(n) }
}

impl From<RegionIndex> for u32 {
    fn from(r: RegionIndex) -> u32 { r.0 }
}

impl fmt::Display for RegionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RegionIndex {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s.trim().parse::<u32>().map_err(|_| CoreError::InvalidRegionIndex)?;
        Self::new(n)
    }
}

/// Display name of a political grouping (party or coalition), after alias resolution.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupingName(String);

impl GroupingName {
    /// Grouping used for candidates that are missing from the membership map.
    pub const UNKNOWN: &'static str = "<unknown>";

    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.trim().is_empty() { Err(CoreError::InvalidGroupingName) } else { Ok(Self(s)) }
    }

    pub fn unknown() -> Self { Self(Self::UNKNOWN.to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for GroupingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GroupingName {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

/// "RES:" + 64-hex (lowercase) digest of a run's canonical allocation data.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResultId(String);

impl ResultId {
    pub fn from_hex(hex64: &str) -> Result<Self, CoreError> {
        if is_lower_hex_len(hex64, 64) {
            let mut s = String::with_capacity(68);
            s.push_str("RES:");
            s.push_str(hex64);
            Ok(Self(s))
        } else {
            Err(CoreError::InvalidId)
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResultId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("RES:").ok_or(CoreError::InvalidId)?;
        if is_lower_hex_len(rest, 64) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidId) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_index_is_one_based() {
        assert!(RegionIndex::new(0).is_err());
        let r = RegionIndex::from_position(0).unwrap();
        assert_eq!(r.get(), 1);
        assert_eq!(r.position(), 0);
        assert_eq!("41".parse::<RegionIndex>().unwrap().position(), 40);
    }

    #[test]
    fn grouping_name_rejects_blank() {
        assert!(GroupingName::new("  ").is_err());
        assert_eq!(GroupingName::new("KO").unwrap().as_str(), "KO");
        assert_eq!(GroupingName::unknown().as_str(), "<unknown>");
    }

    #[test]
    fn result_id_requires_prefix_and_hex() {
        let ok = format!("RES:{}", "a".repeat(64));
        assert!(ok.parse::<ResultId>().is_ok());
        assert!("RES:xyz".parse::<ResultId>().is_err());
        assert!("a".repeat(64).parse::<ResultId>().is_err());
    }

    #[test]
    fn candidate_id_parses_signed() {
        assert_eq!("17".parse::<CandidateId>().unwrap().get(), 17);
        assert!("x".parse::<CandidateId>().is_err());
    }
}
