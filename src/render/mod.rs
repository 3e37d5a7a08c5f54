//! Renderer module — output-style selection for the generated README.

pub mod markdown;

use anyhow::{anyhow, Result};

/// Output style for the generated document.
///
/// One renderer, two dialects: the full deployment walkthrough and a shorter
/// prose rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Link blurb, full quickstart steps, jsonnet stubs, parameter tables.
    Deploy,
    /// Description blurb, bare command blocks, bullet-list parameters.
    Plain,
}

/// Resolve a style by its command-line name.
pub fn parse_style(name: &str) -> Result<Style> {
    match name {
        "deploy" => Ok(Style::Deploy),
        "plain" => Ok(Style::Plain),
        _ => Err(anyhow!("unknown style: {}. Use deploy or plain", name)),
    }
}
