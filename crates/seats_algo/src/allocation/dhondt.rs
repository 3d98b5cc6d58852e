//! D’Hondt (highest averages) allocation for one region.
//!
//! Contract:
//! - Every grouping with total `V` contributes `seats` quotients
//!   `floor(V / 1), floor(V / 2), …, floor(V / seats)`.
//! - The pooled quotients are sorted descending; the top `seats` entries each
//!   award one seat to their grouping.
//! - Ties between equal quotients follow `TiePolicy`:
//!   DeterministicOrder → grouping name ascending, then divisor index;
//!   FirstSeen → order of `totals`, then divisor index;
//!   Random → the tied run straddling the last seat is shuffled by `TieRng`.
//! - Pure integers; `u64` totals.
//!
//! Quotients are truncated before comparison, so `100/3` and `67/2` compare
//! equal (both 33) and are settled by the tie policy.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use seats_core::{
    determinism::StableOrd,
    ids::GroupingName,
    rng::TieRng,
    variables::TiePolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Policy was Random but no RNG was supplied (and seats > 0).
    MissingRngForRandomPolicy,
}

/// Vote total of one grouping within a region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupTotal {
    pub grouping: GroupingName,
    pub votes: u64,
}

/// One pooled `(grouping, quotient)` pair. `slot` indexes the ordered totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quotient {
    pub slot: usize,
    pub divisor_index: u32,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhondtOutcome {
    /// Every grouping of `totals`, zero seats included; empty when `seats == 0`.
    pub seats: BTreeMap<GroupingName, u32>,
    pub last_seat_tie: bool,
}

/// Build the quotient pool for `totals` (in the given order) sorted by
/// descending value. The sort is stable, so equal values keep
/// `(slot, divisor_index)` order.
pub fn quotient_pool(totals: &[GroupTotal], seats: u32) -> Vec<Quotient> {
    let mut pool = Vec::with_capacity(totals.len().saturating_mul(seats as usize));
    for (slot, t) in totals.iter().enumerate() {
        for i in 0..seats {
            pool.push(Quotient { slot, divisor_index: i, value: t.votes / (u64::from(i) + 1) });
        }
    }
    pool.sort_by(|a, b| b.value.cmp(&a.value));
    pool
}

/// Allocate `seats` among `totals` with D’Hondt.
///
/// *Notes*:
/// - If `seats == 0`, returns an empty map.
/// - With no groupings, nothing is awarded (the map is empty).
/// - Groupings are expected to be unique in `totals`.
pub fn allocate_dhondt(
    seats: u32,
    totals: &[GroupTotal],
    tie_policy: TiePolicy,
    rng: Option<&mut TieRng>,
) -> Result<DhondtOutcome, AllocError> {
    if seats == 0 {
        return Ok(DhondtOutcome { seats: BTreeMap::new(), last_seat_tie: false });
    }
    if matches!(tie_policy, TiePolicy::Random) && rng.is_none() {
        return Err(AllocError::MissingRngForRandomPolicy);
    }

    let ordered = order_for_policy(totals, tie_policy);
    let mut pool = quotient_pool(&ordered, seats);
    let take = (seats as usize).min(pool.len());

    let last_seat_tie = take > 0 && take < pool.len() && pool[take - 1].value == pool[take].value;

    if last_seat_tie {
        if let (TiePolicy::Random, Some(rng)) = (tie_policy, rng) {
            let v = pool[take - 1].value;
            let start = pool[..take].iter().rposition(|q| q.value != v).map_or(0, |p| p + 1);
            let end = pool[take..].iter().position(|q| q.value != v).map_or(pool.len(), |p| take + p);
            rng.shuffle_in_place(&mut pool[start..end]);
        }
    }

    let mut alloc: BTreeMap<GroupingName, u32> =
        ordered.iter().map(|t| (t.grouping.clone(), 0)).collect();
    for q in &pool[..take] {
        if let Some(n) = alloc.get_mut(&ordered[q.slot].grouping) {
            *n += 1;
        }
    }

    Ok(DhondtOutcome { seats: alloc, last_seat_tie })
}

/// Baseline order of the groupings before pooling.
fn order_for_policy(totals: &[GroupTotal], tie_policy: TiePolicy) -> Vec<GroupTotal> {
    let mut ordered = totals.to_vec();
    match tie_policy {
        TiePolicy::FirstSeen => {}
        TiePolicy::DeterministicOrder | TiePolicy::Random => {
            ordered.sort_by(|a, b| a.grouping.stable_cmp(&b.grouping));
        }
    }
    ordered
}
