// crates/seats_cli/src/args.rs
//
// Offline CLI argument surface: flag definitions, seed/policy parsers,
// local-path checks, and normalization.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use seats_core::variables::TiePolicy;
use seats_io::looks_like_url_strict;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "seats",
    disable_help_subcommand = true,
    about = "Offline D'Hondt seat allocation per region with national totals"
)]
pub struct Args {
    /// Data directory holding `committees.json` and `regions/<N>.json`.
    #[arg(long)]
    pub data: PathBuf,

    /// Election config JSON (seat table, aliases, tie policy).
    #[arg(long)]
    pub config: PathBuf,

    /// List the winning candidates under each grouping.
    #[arg(long)]
    pub print_names: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the JSON report to this file instead of stdout (json only).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Override the config's tie policy (deterministic_order | first_seen | random).
    #[arg(long, value_parser = parse_tie_policy)]
    pub tie_policy: Option<TiePolicy>,

    /// Tie RNG seed override. Accepts decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Allocate regions on worker threads.
    #[arg(long)]
    pub parallel: bool,

    /// Load config and committees, then stop.
    #[arg(long)]
    pub validate_only: bool,

    /// Only warnings and errors on stderr.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Errors surfaced by argument validation.
/// Messages are short and stable (scripts and tests match on them).
#[derive(Debug)]
pub enum CliError {
    BadCombo(&'static str),
    NonLocalPath(String),
    NotFound(String),
    NotADirectory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            BadCombo(s) => write!(f, "invalid flag combination: {s}"),
            NonLocalPath(p) => write!(f, "path must be local (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            NotADirectory(p) => write!(f, "not a directory: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

pub fn parse_tie_policy(s: &str) -> Result<TiePolicy, String> {
    s.trim()
        .parse::<TiePolicy>()
        .map_err(|_| format!("unknown tie policy `{s}` (deterministic_order | first_seen | random)"))
}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Flag combination and path checks, then absolute paths.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    for p in [Some(args.data.as_path()), Some(args.config.as_path()), args.out.as_deref()]
        .into_iter()
        .flatten()
    {
        ensure_local_path(p)?;
    }

    if args.out.is_some() && args.format != OutputFormat::Json {
        return Err(CliError::BadCombo("--out requires --format json"));
    }
    if args.validate_only && args.out.is_some() {
        return Err(CliError::BadCombo("--validate-only writes no output; drop --out"));
    }

    ensure_local_file(&args.config, "--config")?;
    ensure_local_dir(&args.data, "--data")?;

    args.data = normalize_path(&args.data);
    args.config = normalize_path(&args.config);
    args.out = args.out.take().map(|p| normalize_path(&p));
    Ok(args)
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if looks_like_url_strict(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_local_file(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

fn ensure_local_dir(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_dir() {
        return Err(CliError::NotADirectory(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort absolute path; falls back to CWD-relative when the path does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}
