//! Plain-text renderer.
//!
//! ```text
//! Region 1:
//!     KO: 5
//!         Ewa Lis
//!     PiS: 3
//! Total:
//!     KO: 5
//!     PiS: 3
//! ```
//! (indentation is one tab per level). Groupings with zero seats are not
//! listed. Winner names appear only when the run kept winner detail. A failed
//! region prints its header only; the reasons follow in `Failed regions:`.

use std::fmt::Write as _;

use crate::structure::ReportModel;

pub fn render_text(m: &ReportModel) -> String {
    let mut out = String::new();

    for block in &m.regions {
        let _ = writeln!(out, "Region {}:", block.index);
        let Some(alloc) = &block.allocation else { continue };
        for row in alloc.groupings.iter().filter(|r| r.seats > 0) {
            let _ = writeln!(out, "\t{}: {}", row.name, row.seats);
            for w in row.winners.iter().flatten() {
                let _ = writeln!(out, "\t\t{}", w.name);
            }
        }
    }

    out.push_str("Total:\n");
    for row in m.national.iter().filter(|r| r.seats > 0) {
        let _ = writeln!(out, "\t{}: {}", row.name, row.seats);
    }

    if !m.failed.is_empty() {
        out.push_str("Failed regions:\n");
        for f in &m.failed {
            let _ = writeln!(out, "\t{} ({}): {}", f.index, f.kind, f.reason);
        }
    }
    out
}
