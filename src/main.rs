//! protodoc — generate a library README from annotated prototype descriptors.
//!
//! Reads the library schema (`mixin.json` / `mixin.yaml`), parses the heading
//! comment block of every prototype descriptor, and renders one README:
//!
//! - `protodoc path/to/lib`: scan `path/to/lib/prototypes/*.jsonnet`
//! - `protodoc path/to/lib 'protos/*.jsonnet' -o docs/README.md -s plain`
//!
//! Any malformed descriptor aborts the whole run; no partial document is
//! ever written.

mod anchors;
mod model;
mod parser;
mod render;
mod schema;

use anyhow::{bail, Context, Result};
use clap::Parser;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Descriptor files recognized by directory scans.
static RE_DESCRIPTOR_FILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.jsonnet$").unwrap());

/// Directory inside the library holding prototype descriptors.
const PROTOTYPE_DIR: &str = "prototypes";

#[derive(Parser)]
#[command(
    name = "protodoc",
    about = "Generate a README from prototype heading comments and a library schema"
)]
struct Cli {
    /// Library directory containing mixin.json (or mixin.yaml)
    lib: PathBuf,

    /// Descriptor files (glob patterns supported).
    /// If omitted, scans <LIB>/prototypes for .jsonnet files.
    prototypes: Vec<String>,

    /// Output file. Defaults to <LIB>/README.md; use - for stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output style: deploy (default) or plain
    #[arg(short = 's', long, default_value = "deploy")]
    style: String,

    /// Continuation join policy for wrapped fields: space (default) or newline
    #[arg(long, default_value = "space")]
    join: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let style = render::parse_style(&cli.style)?;
    let join = parse_join(&cli.join)?;

    let schema = schema::load(&cli.lib)?;
    let quick_start = schema.require_quick_start()?;

    let files = descriptor_files(&cli)?;
    let mut prototypes = Vec::with_capacity(files.len());
    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let proto = parser::parse_with(&content, join)
            .with_context(|| format!("invalid prototype descriptor {}", path.display()))?;
        prototypes.push(proto);
    }

    let doc = render::markdown::render(&schema, quick_start, &prototypes, style);

    match cli.output.as_deref() {
        Some(path) if path == Path::new("-") => print!("{}", doc),
        Some(path) => {
            fs::write(path, &doc).with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            let path = cli.lib.join("README.md");
            fs::write(&path, &doc)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    Ok(())
}

/// Resolve the continuation join policy from its command-line name.
fn parse_join(name: &str) -> Result<parser::JoinPolicy> {
    match name {
        "space" => Ok(parser::JoinPolicy::Space),
        "newline" => Ok(parser::JoinPolicy::Newline),
        _ => bail!("unknown join policy: {}. Use space or newline", name),
    }
}

/// Resolve the descriptor files to document.
///
/// Explicit arguments win; otherwise the library's prototypes/ directory is
/// scanned. Results are filename-sorted so the rendered order is stable.
fn descriptor_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    if cli.prototypes.is_empty() {
        return scan_descriptor_dir(&cli.lib.join(PROTOTYPE_DIR));
    }
    expand_globs(&cli.prototypes)
}

/// Scan a directory for descriptor files (non-recursive).
/// A missing directory is an empty library, not an error.
fn scan_descriptor_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_descriptor(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_descriptor(path: &Path) -> bool {
    path.to_str().is_some_and(|p| RE_DESCRIPTOR_FILE.is_match(p))
}

/// Expand glob patterns into a list of descriptor paths.
/// Bare directory arguments are scanned like the default prototypes/ dir.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            files.extend(scan_descriptor_dir(path)?);
            continue;
        }
        let matches: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}
