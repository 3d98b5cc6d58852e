//! Deterministic, integer-only RNG for tie-breaking under `TiePolicy::Random`.
//!
//! - `tie_seed` is the only source of randomness; no OS entropy.
//! - Each region derives its own stream from `(tie_seed, region_index)`, so the
//!   outcome does not depend on the order in which regions are processed.
//! - Unbiased ranges via rejection sampling; no floating point.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use crate::ids::RegionIndex;

/// Deterministic RNG for ties.
///
/// The 32-byte ChaCha20 seed is explicit: `seed.to_le_bytes()` in bytes 0..8,
/// the region index (little-endian `u32`) in bytes 8..12, zero elsewhere.
#[derive(Debug, Clone)]
pub struct TieRng {
    rng: ChaCha20Rng,
    words_consumed: u128,
}

impl TieRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        Self::from_seed_bytes(seed, 0)
    }

    /// Independent stream for one region.
    #[inline]
    pub fn for_region(seed: u64, region: RegionIndex) -> Self {
        Self::from_seed_bytes(seed, region.get())
    }

    fn from_seed_bytes(seed: u64, salt: u32) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        seed32[8..12].copy_from_slice(&salt.to_le_bytes());
        Self { rng: ChaCha20Rng::from_seed(seed32), words_consumed: 0 }
    }

    /// Number of 64-bit words drawn so far (saturating).
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)`; `None` if `n == 0`.
    ///
    /// Accepts `x` when `x >= 2^64 mod n`, then `x % n` is uniform.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        if len <= 1 {
            return;
        }
        for i in (1..len).rev() {
            // i + 1 > 0, so a value is always produced.
            if let Some(j) = self.gen_range((i as u64) + 1) {
                slice.swap(i, j as usize);
            }
        }
    }
}
