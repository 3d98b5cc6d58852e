//! JSON renderer: regions → national → failed_regions → integrity.
//!
//! Builds a `serde_json::Value`; callers that persist it go through the
//! canonical writer (sorted keys), so insertion order here is cosmetic.

use serde_json::{json, Map as JsonMap, Value};

use crate::structure::{GroupingRow, IntegrityBlock, RegionBlock, ReportModel};

pub fn render_json(m: &ReportModel) -> Value {
    let mut root = JsonMap::new();
    root.insert("regions".into(), Value::Array(m.regions.iter().map(region_json).collect()));
    root.insert(
        "national".into(),
        Value::Array(m.national.iter().map(|r| json!({"grouping": r.name, "seats": r.seats})).collect()),
    );
    root.insert(
        "failed_regions".into(),
        Value::Array(
            m.failed
                .iter()
                .map(|f| json!({"region": f.index, "kind": f.kind, "reason": f.reason}))
                .collect(),
        ),
    );
    root.insert("integrity".into(), integrity_json(&m.integrity));
    Value::Object(root)
}

fn region_json(b: &RegionBlock) -> Value {
    let mut o = JsonMap::new();
    o.insert("region".into(), b.index.into());
    match &b.allocation {
        Some(a) => {
            o.insert("status".into(), "ok".into());
            o.insert("seat_count".into(), a.seat_count.into());
            o.insert("last_seat_tie".into(), a.last_seat_tie.into());
            o.insert("groupings".into(), Value::Array(a.groupings.iter().map(grouping_json).collect()));
        }
        None => {
            o.insert("status".into(), "failed".into());
        }
    }
    Value::Object(o)
}

fn grouping_json(g: &GroupingRow) -> Value {
    let mut o = JsonMap::new();
    o.insert("grouping".into(), g.name.clone().into());
    o.insert("votes".into(), g.votes.into());
    o.insert("seats".into(), g.seats.into());
    if let Some(ws) = &g.winners {
        let list = ws
            .iter()
            .map(|w| json!({"candidate_id": w.candidate_id, "name": w.name, "votes": w.votes}))
            .collect();
        o.insert("winners".into(), Value::Array(list));
    }
    Value::Object(o)
}

fn integrity_json(i: &IntegrityBlock) -> Value {
    let mut o = JsonMap::new();
    o.insert("result_id".into(), i.result_id.clone().into());
    o.insert("seats_allocated".into(), i.seats_allocated.into());
    o.insert("tie_policy".into(), i.tie_policy.into());
    if let Some(seed) = i.tie_seed {
        o.insert("tie_seed".into(), seed.into());
    }
    let mut inputs = JsonMap::new();
    inputs.insert("config_sha256".into(), i.config_sha256.clone().into());
    if let Some(c) = &i.committees_sha256 {
        inputs.insert("committees_sha256".into(), c.clone().into());
    }
    let regions: JsonMap<String, Value> =
        i.region_sha256.iter().map(|(r, h)| (r.to_string(), Value::String(h.clone()))).collect();
    inputs.insert("regions_sha256".into(), Value::Object(regions));
    o.insert("inputs".into(), Value::Object(inputs));
    Value::Object(o)
}
