//! Tests for validating zipped folder trees
//!
//! Archives are built in memory with `ZipWriter`, validated in a temporary
//! directory, and the resulting summary and report are inspected.

use anyhow::Result;
use skucheck::{check_archive, extract_zip, IssueKind, ReportFormat, RuleSet, MANDATORY_SEGMENTS};
use std::io::{Cursor, Write};
use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn rules() -> RuleSet {
    RuleSet::parse(&MANDATORY_SEGMENTS.join("\n")).unwrap()
}

fn build_zip(entries: &[&str]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for name in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options)?;
        } else {
            writer.start_file(*name, options)?;
            writer.write_all(b"jpeg")?;
        }
    }
    Ok(writer.finish()?.into_inner())
}

fn complete_folder(folder: &str) -> Vec<String> {
    MANDATORY_SEGMENTS
        .iter()
        .map(|segment| format!("{}/shelf-{}.jpg", folder, segment))
        .collect()
}

/// A wrapped tree with only valid folders yields no report
#[test]
fn clean_archive_produces_no_report() -> Result<()> {
    let names = complete_folder("ImgNameCheck/abcdefghijklmnopq");
    let data = build_zip(&names.iter().map(String::as_str).collect::<Vec<_>>())?;

    let out = tempdir()?;
    let report_path = out.path().join("report.xlsx");
    let outcome = check_archive(&data, rules(), &report_path, ReportFormat::Xlsx)?;

    assert_eq!(outcome.summary.folders_checked, 1);
    assert!(outcome.report.is_none());
    assert!(!report_path.exists());
    Ok(())
}

/// Issues are reported but the extracted folders are not relabeled
#[test]
fn issues_in_archive_are_reported_without_renaming() -> Result<()> {
    let mut names = complete_folder("abcdefghijklmnopq");
    names.push("short/Shelf-f1w.jpg".to_string());
    names.push("__MACOSX/short/._Shelf-f1w.jpg".to_string());
    let data = build_zip(&names.iter().map(String::as_str).collect::<Vec<_>>())?;

    let out = tempdir()?;
    let report_path = out.path().join("report.csv");
    let outcome = check_archive(&data, rules(), &report_path, ReportFormat::Csv)?;

    assert_eq!(outcome.summary.folders_checked, 2);
    assert_eq!(outcome.summary.invalid_folders, 1);
    assert_eq!(outcome.summary.renamed_folders, 0);
    assert_eq!(outcome.report.as_deref(), Some(report_path.as_path()));

    let kinds: Vec<IssueKind> = outcome.summary.records.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::FolderNameLength,
            IssueKind::FilenameCase,
            IssueKind::MissingMandatorySegments
        ]
    );

    let content = std::fs::read_to_string(&report_path)?;
    assert!(content.contains("short,Shelf-f1w.jpg,Filename case error"));
    Ok(())
}

/// macOS metadata is skipped and the extraction directory disappears on drop
#[test]
fn extraction_skips_macos_metadata_and_cleans_up_on_drop() -> Result<()> {
    let data = build_zip(&["top/", "top/abcdefghijklmnopq/shelf-f1w.jpg", "__MACOSX/top/._x"])?;

    let extracted = extract_zip(&data)?;
    let path = extracted.path().to_path_buf();
    assert!(path.join("top/abcdefghijklmnopq/shelf-f1w.jpg").is_file());
    assert!(!path.join("__MACOSX").exists());

    drop(extracted);
    assert!(!path.exists());
    Ok(())
}

/// Data that is not a zip archive is rejected
#[test]
fn garbage_archive_is_an_error() {
    let out = tempdir().unwrap();
    let result = check_archive(
        b"not a zip",
        rules(),
        &out.path().join("unused.xlsx"),
        ReportFormat::Xlsx,
    );
    assert!(result.is_err());
}

/// A zip holding one SKU folder validates that folder instead of looking inside it
#[test]
fn single_sku_folder_archive_is_checked() -> Result<()> {
    let data = build_zip(&["bad/Shelf-F1W.JPG", "bad/junk.jpg"])?;

    let out = tempdir()?;
    let report_path = out.path().join("report.csv");
    let outcome = check_archive(&data, rules(), &report_path, ReportFormat::Csv)?;

    assert_eq!(outcome.summary.folders_checked, 1);
    assert_eq!(outcome.summary.invalid_folders, 1);
    assert_eq!(outcome.report.as_deref(), Some(report_path.as_path()));

    let mut kinds: Vec<IssueKind> = outcome.summary.records.iter().map(|r| r.kind).collect();
    kinds.sort_by_key(|kind| format!("{:?}", kind));
    assert_eq!(
        kinds,
        vec![
            IssueKind::ExtensionCase,
            IssueKind::FolderNameLength,
            IssueKind::MissingMandatorySegments,
            IssueKind::NamingStructure,
        ]
    );
    Ok(())
}
