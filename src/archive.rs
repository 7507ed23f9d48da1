//! Upload variant: the folder tree arrives as a zip archive, is validated in
//! a private temporary directory, and only the report leaves it.

use crate::report::{write_report, ReportFormat};
use crate::rules::RuleSet;
use crate::validator::{ValidationSummary, Validator};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Metadata folder macOS adds to archives it creates.
const MACOS_METADATA_DIR: &str = "__MACOSX";

#[derive(Debug)]
pub struct ArchiveOutcome {
    pub summary: ValidationSummary,
    pub report: Option<PathBuf>,
}

/// Fetches an archive over HTTP(S).
pub fn fetch_archive(url: &str) -> Result<Vec<u8>> {
    let parsed = url::Url::parse(url).context("Invalid archive URL")?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Archive URL must use http or https, got: {}", parsed.scheme());
    }

    let response = reqwest::blocking::get(parsed.as_str())
        .with_context(|| format!("Failed to fetch archive from: {}", parsed))?;

    if !response.status().is_success() {
        anyhow::bail!(
            "HTTP error {}: Failed to fetch archive",
            response.status()
        );
    }

    let bytes = response
        .bytes()
        .context("Failed to read archive response body")?;
    Ok(bytes.to_vec())
}

/// Extracts a zip archive into a fresh temporary directory, which is deleted
/// when the returned handle is dropped.
pub fn extract_zip(data: &[u8]) -> Result<TempDir> {
    let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).context("Failed to open zip archive")?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path '{}'", entry.name());
            continue;
        };

        if relative
            .components()
            .next()
            .is_some_and(|c| c.as_os_str() == MACOS_METADATA_DIR)
        {
            continue;
        }

        let out_path = temp_dir.path().join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("Failed to create {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut out = File::create(&out_path)
            .with_context(|| format!("Failed to create {}", out_path.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to extract {}", relative.display()))?;
        debug!("Extracted '{}'", relative.display());
    }

    Ok(temp_dir)
}

/// Archives usually wrap the SKU folders in one top-level directory. That
/// directory becomes the validation root only when it is the sole entry and
/// holds folders but no files; a zipped single SKU folder is validated from
/// the extraction directory so the folder itself gets checked.
pub fn validation_root(extracted: &Path) -> Result<PathBuf> {
    let entries = list_dir(extracted)?;

    if let [only] = entries.as_slice() {
        if only.is_dir() {
            let inner = list_dir(only)?;
            if !inner.is_empty() && inner.iter().all(|path| path.is_dir()) {
                return Ok(only.clone());
            }
        }
    }

    Ok(extracted.to_path_buf())
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<_>>()?;
    Ok(entries)
}

/// Validates the tree inside `data` without renaming anything and writes the
/// report to `report_path` if issues were found. The extracted copy is
/// removed on every exit path.
pub fn check_archive(
    data: &[u8],
    rules: RuleSet,
    report_path: &Path,
    format: ReportFormat,
) -> Result<ArchiveOutcome> {
    let extracted = extract_zip(data)?;
    let root = validation_root(extracted.path())?;
    info!("Validating extracted archive at '{}'", root.display());

    let summary = Validator::new(rules)
        .mark_invalid(false)
        .validate_root(&root)?;
    let report = write_report(&summary.records, report_path, format)?;

    Ok(ArchiveOutcome { summary, report })
}
