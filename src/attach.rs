//! Reading attachment files from disk

use anyhow::{bail, Context, Result};
use cashdesk_core::{DropFilter, RawFile};
use std::path::Path;

/// Read every file matched by the patterns and keep the accepted ones
///
/// A pattern that matches no file is an error; files the filter rejects are
/// skipped with a warning.
pub fn read_attachments(patterns: &[String], filter: &DropFilter) -> Result<Vec<RawFile>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        let paths = glob::glob(pattern).with_context(|| format!("Invalid file pattern '{}'", pattern))?;
        for entry in paths {
            let path = entry?;
            if path.is_file() {
                matched = true;
                files.push(read_file(&path)?);
            }
        }
        if !matched {
            bail!("No file matches '{}'", pattern);
        }
    }

    let (accepted, rejected) = filter.partition(files);
    for file in &rejected {
        log::warn!("Skipping {} ({}): not an accepted file type", file.name, file.content_type);
    }
    Ok(accepted)
}

fn read_file(path: &Path) -> Result<RawFile> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    log::debug!("read {} ({}, {} bytes)", name, content_type, bytes.len());
    Ok(RawFile::new(name, content_type.essence_str(), bytes))
}
