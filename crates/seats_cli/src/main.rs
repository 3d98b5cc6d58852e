// crates/seats_cli/src/main.rs
//
// `seats` binary: parse flags → load config (+ overrides) → load committees →
// run the pipeline → render text or JSON. Exit codes are fixed (see `exitcodes`).

mod args;
mod logging;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad flags, bad config, malformed input JSON.
    pub const VALIDATION: i32 = 2;
    /// Read/write/path failures.
    pub const IO: i32 = 4;
    /// The run finished but no region could be allocated.
    pub const ALL_FAILED: i32 = 5;
}

use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info, warn};

use args::{parse_and_validate as parse_cli, Args, OutputFormat};
use seats_core::variables::{self, ElectionConfig};
use seats_io::{canonical_json, loader, IoError};
use seats_pipeline::{load_dir_ctx, run_with_ctx, PipelineError, PipelineOutputs, RunOptions};
use seats_report::{build_model, render_text, ReportError, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Config domain / JSON shape failures.
    Validation(String),
    /// I/O errors (read/write/path/limits).
    Io(String),
    /// Report build or output.
    Render(String),
    /// Worker or other internal failure.
    Other(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
            MainError::Other(m) => write!(f, "{m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seats: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    logging::init(args.quiet);

    let result = if args.validate_only { validate_only(&args).map(|()| exitcodes::OK) } else { run_once(&args) };
    let rc = match result {
        Ok(rc) => rc,
        Err(e) => {
            error!(error = %e, "run aborted");
            eprintln!("seats: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// Config file with CLI overrides applied, then domain-checked.
fn effective_config(args: &Args) -> Result<ElectionConfig, MainError> {
    let (mut cfg, _sha): (ElectionConfig, String) = loader::read_json(&args.config).map_err(map_io_err)?;

    if args.print_names {
        cfg.with_winners = true;
    }
    if let Some(policy) = args.tie_policy {
        cfg.tie_policy = policy;
    }
    if let Some(seed) = args.seed {
        cfg.tie_seed = Some(seed);
    }

    variables::validate_domains(&cfg)
        .map_err(|e| MainError::Validation(format!("{}: {e}", args.config.display())))?;
    Ok(cfg)
}

/// Load config and committees only; no allocation, no output.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let cfg = effective_config(args)?;
    let ctx = load_dir_ctx(&args.data, cfg, RunOptions::default()).map_err(map_pipeline_err)?;
    info!(
        regions = ctx.config.region_count(),
        candidates = ctx.directory.len(),
        "validate-only: inputs OK"
    );
    Ok(())
}

fn run_once(args: &Args) -> Result<i32, MainError> {
    let cfg = effective_config(args)?;
    let ctx = load_dir_ctx(&args.data, cfg, RunOptions { parallel: args.parallel }).map_err(map_pipeline_err)?;
    let outs = run_with_ctx(&ctx).map_err(map_pipeline_err)?;

    let model = build_model(&outs).map_err(map_report_err)?;
    match args.format {
        OutputFormat::Text => write_stdout(render_text(&model).as_bytes())?,
        OutputFormat::Json => emit_json(&model, args.out.as_deref())?,
    }

    Ok(exit_status(&outs))
}

fn exit_status(outs: &PipelineOutputs) -> i32 {
    if outs.all_failed() {
        warn!(regions = outs.regions.len(), "no region could be allocated");
        exitcodes::ALL_FAILED
    } else {
        exitcodes::OK
    }
}

#[cfg(feature = "report-json")]
fn emit_json(model: &ReportModel, out: Option<&Path>) -> Result<(), MainError> {
    let value = seats_report::render_json(model);
    match out {
        Some(path) => {
            canonical_json::write_canonical_file(path, &value)
                .map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?;
            info!(path = %path.display(), "report written");
            Ok(())
        }
        None => {
            let mut bytes = canonical_json::to_canonical_json_bytes(&value)
                .map_err(|e| MainError::Render(format!("report to JSON: {e}")))?;
            bytes.push(b'\n');
            write_stdout(&bytes)
        }
    }
}

#[cfg(not(feature = "report-json"))]
fn emit_json(_model: &ReportModel, _out: Option<&Path>) -> Result<(), MainError> {
    Err(MainError::Render("json output not enabled (build with feature `report-json`)".into()))
}

fn write_stdout(bytes: &[u8]) -> Result<(), MainError> {
    let mut out = std::io::stdout().lock();
    out.write_all(bytes)
        .and_then(|()| out.flush())
        .map_err(|e| MainError::Io(format!("stdout: {e}")))
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Render(_) => IO,
        MainError::Other(_) => IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Invalid(m) => MainError::Validation(m),
        IoError::Remote(p) => MainError::Validation(format!("remote path refused: {p}")),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        e @ IoError::TooLarge { .. } => MainError::Io(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Config(m) => MainError::Validation(m),
        PipelineError::Worker(m) => MainError::Other(format!("worker: {m}")),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}
