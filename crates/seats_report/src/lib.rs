//! seats_report — offline report model + renderers (text/JSON).
//!
//! - No I/O here. Callers pass finished `PipelineOutputs`; writing files is the CLI's job.
//! - Stable section order: regions, national, failed regions, integrity.

#![deny(unsafe_code)]

use core::fmt;

pub mod structure;
pub mod render_text;
#[cfg(feature = "render_json")]
pub mod render_json;

pub use structure::{build_model, ReportModel};
pub use render_text::render_text;
#[cfg(feature = "render_json")]
pub use render_json::render_json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    Inconsistent(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Inconsistent(what) => write!(f, "inconsistent outputs: {what}"),
        }
    }
}

impl std::error::Error for ReportError {}
