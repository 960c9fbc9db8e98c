use std::fs;
use std::io::{self, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::app::BuildSummary;
use crate::domain::GenomeCatalog;
use crate::error::KiraError;

pub const DEFAULT_OUTPUT_PATH: &str = "genome_metadata.json";

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

/// Pretty JSON with two-space indentation and a trailing newline.
pub fn render_catalog(catalog: &GenomeCatalog) -> Result<String, KiraError> {
    let mut json = serde_json::to_string_pretty(catalog)
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// Writes the rendered catalog next to `path` and renames it into place.
pub fn write_catalog(path: &Utf8Path, catalog: &GenomeCatalog) -> Result<(), KiraError> {
    let content = render_catalog(catalog)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix("kira-gm-")
        .suffix(".json.tmp")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    temp.persist(path.as_std_path())
        .map_err(|err| KiraError::Filesystem(format!("persist {path}: {}", err.error)))?;
    Ok(())
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_catalog(catalog: &GenomeCatalog) -> io::Result<()> {
        let json = render_catalog(catalog).map_err(io::Error::other)?;
        io::stdout().write_all(json.as_bytes())
    }

    pub fn print_summary(summary: &BuildSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
