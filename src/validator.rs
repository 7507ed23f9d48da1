use crate::checks::{default_chain, FileCheck, Verdict};
use crate::rules::{RuleSet, MANDATORY_SEGMENTS};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// SKU folder names are exactly this many characters long.
pub const VALID_FOLDER_NAME_LENGTHS: [usize; 2] = [17, 20];

/// Prefix given to folders with at least one recorded issue.
pub const INVALID_PREFIX: &str = "INVALID_";

/// Stands in for the file column when an issue concerns the folder itself.
pub const FOLDER_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    FolderNameLength,
    ExtensionCase,
    FilenameCase,
    NamingStructure,
    UnauthorizedRuleSegment,
    MissingMandatorySegments,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FolderNameLength => "Folder naming error",
            Self::ExtensionCase => "Extension case error",
            Self::FilenameCase => "Filename case error",
            Self::NamingStructure => "Naming structure error",
            Self::UnauthorizedRuleSegment => "Unauthorized rule segment",
            Self::MissingMandatorySegments => "Missing core files",
        }
    }

    /// The "correct example" column of the report.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::FolderNameLength => "Folder name must be 17 or 20 characters long",
            Self::ExtensionCase => "Extension must be lowercase .jpg",
            Self::FilenameCase => {
                "All letters must be lowercase, e.g. pipe-shelves-m100-1.2w.jpg"
            }
            Self::NamingStructure => "Example: pipe-shelves-m100-1.2w.jpg",
            Self::UnauthorizedRuleSegment => "Allowed rule segments include: m100-1.2w",
            Self::MissingMandatorySegments => {
                "These rule segments are required (optionally after a lowercase keyword segment)"
            }
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub folder: String,
    /// Offending file name, the folder marker, or the list of missing segments.
    pub subject: String,
    pub kind: IssueKind,
}

impl ErrorRecord {
    pub fn new(folder: &str, subject: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            folder: folder.to_string(),
            subject: subject.into(),
            kind,
        }
    }

    pub fn row(&self) -> [&str; 4] {
        [
            self.folder.as_str(),
            self.subject.as_str(),
            self.kind.label(),
            self.kind.hint(),
        ]
    }
}

/// Findings for a single folder, computed without touching the filesystem.
#[derive(Debug, Default)]
pub struct FolderReport {
    pub folder: String,
    pub records: Vec<ErrorRecord>,
    pub found_segments: BTreeSet<String>,
    pub missing_segments: Vec<String>,
}

impl FolderReport {
    pub fn is_valid(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ValidationSummary {
    pub folders_checked: usize,
    pub invalid_folders: usize,
    pub renamed_folders: usize,
    pub rename_failures: usize,
    pub records: Vec<ErrorRecord>,
}

impl ValidationSummary {
    pub fn has_issues(&self) -> bool {
        !self.records.is_empty()
    }
}

pub struct Validator {
    rules: RuleSet,
    checks: Vec<Box<dyn FileCheck>>,
    mark_invalid: bool,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            checks: default_chain(),
            mark_invalid: true,
        }
    }

    /// When disabled the run is report-only and no folder is renamed.
    pub fn mark_invalid(mut self, enabled: bool) -> Self {
        self.mark_invalid = enabled;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Runs the check chain on one file name; the first check with an opinion wins.
    pub fn check_file(&self, file_name: &str) -> Verdict {
        self.checks
            .iter()
            .find_map(|check| check.check(file_name, &self.rules))
            .unwrap_or(Verdict::Skip)
    }

    pub fn check_folder(&self, folder_path: &Path) -> Result<FolderReport> {
        let folder = folder_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut report = FolderReport {
            folder: folder.clone(),
            ..FolderReport::default()
        };

        if !VALID_FOLDER_NAME_LENGTHS.contains(&folder.chars().count()) {
            report
                .records
                .push(ErrorRecord::new(&folder, FOLDER_MARKER, IssueKind::FolderNameLength));
        }

        let entries = fs::read_dir(folder_path)
            .with_context(|| format!("Failed to read folder {}", folder_path.display()))?;

        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();

            match self.check_file(&file_name) {
                Verdict::Skip => debug!("Skipping non-image '{}' in '{}'", file_name, folder),
                Verdict::Issue(kind) => {
                    report.records.push(ErrorRecord::new(&folder, file_name, kind));
                }
                Verdict::Accept(segment) => {
                    report.found_segments.insert(segment);
                }
            }
        }

        report.missing_segments = MANDATORY_SEGMENTS
            .iter()
            .filter(|segment| !report.found_segments.contains(**segment))
            .map(|segment| segment.to_string())
            .collect();

        if !report.missing_segments.is_empty() {
            report.records.push(ErrorRecord::new(
                &folder,
                report.missing_segments.join(", "),
                IssueKind::MissingMandatorySegments,
            ));
        }

        Ok(report)
    }

    /// Checks every immediate subfolder of `root` and, unless running
    /// report-only, relabels the ones with issues.
    pub fn validate_root(&self, root: &Path) -> Result<ValidationSummary> {
        let mut folders: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(root)
            .with_context(|| format!("Failed to read image root {}", root.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                folders.push(path);
            }
        }

        let mut summary = ValidationSummary::default();

        for folder_path in folders {
            let report = self.check_folder(&folder_path)?;
            summary.folders_checked += 1;

            if report.is_valid() {
                debug!("Folder '{}' passed all checks", report.folder);
                continue;
            }

            summary.invalid_folders += 1;
            info!(
                "Folder '{}' has {} issue(s)",
                report.folder,
                report.records.len()
            );

            if self.mark_invalid {
                let target = root.join(format!("{}{}", INVALID_PREFIX, report.folder));
                match fs::rename(&folder_path, &target) {
                    Ok(()) => {
                        summary.renamed_folders += 1;
                        info!(
                            "Marked invalid: '{}' -> '{}'",
                            folder_path.display(),
                            target.display()
                        );
                    }
                    Err(e) => {
                        summary.rename_failures += 1;
                        warn!(
                            "Failed to mark '{}' invalid, error: {}",
                            folder_path.display(),
                            e
                        );
                    }
                }
            }

            summary.records.extend(report.records);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    const SKU_17: &str = "abcdefghijklmnopq";

    fn validator() -> Validator {
        let text = format!("{}\nextra-10w", MANDATORY_SEGMENTS.join("\n"));
        Validator::new(RuleSet::parse(&text).unwrap())
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            File::create(dir.join(name)).unwrap();
        }
    }

    fn complete_set() -> Vec<String> {
        MANDATORY_SEGMENTS
            .iter()
            .map(|segment| format!("pipe-shelves-{}.jpg", segment))
            .collect()
    }

    #[test]
    fn chain_short_circuits_on_first_issue() {
        let v = validator();
        assert_eq!(
            v.check_file("Pipe-Shelves-unknown.JPG"),
            Verdict::Issue(IssueKind::ExtensionCase)
        );
        assert_eq!(
            v.check_file("Pipe-shelves-unknown.jpg"),
            Verdict::Issue(IssueKind::FilenameCase)
        );
        assert_eq!(v.check_file("readme.md"), Verdict::Skip);
        assert_eq!(
            v.check_file("pipe-shelves-m100-1.2w.jpg"),
            Verdict::Accept("m100-1.2w".to_string())
        );
    }

    #[test]
    fn complete_folder_is_valid() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join(SKU_17);
        fs::create_dir(&folder).unwrap();
        let names = complete_set();
        touch(&folder, &names.iter().map(String::as_str).collect::<Vec<_>>());
        touch(&folder, &["notes.txt"]);

        let report = validator().check_folder(&folder).unwrap();
        assert!(report.is_valid(), "{:?}", report.records);
        assert_eq!(report.found_segments.len(), 9);
    }

    #[test]
    fn bad_folder_length_is_recorded_regardless_of_files() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("short");
        fs::create_dir(&folder).unwrap();
        let names = complete_set();
        touch(&folder, &names.iter().map(String::as_str).collect::<Vec<_>>());

        let report = validator().check_folder(&folder).unwrap();
        assert_eq!(
            report.records,
            vec![ErrorRecord::new("short", FOLDER_MARKER, IssueKind::FolderNameLength)]
        );
    }

    #[test]
    fn names_single_missing_segment() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join(SKU_17);
        fs::create_dir(&folder).unwrap();
        let names: Vec<String> = complete_set()
            .into_iter()
            .filter(|name| !name.contains("f4w"))
            .collect();
        touch(&folder, &names.iter().map(String::as_str).collect::<Vec<_>>());

        let report = validator().check_folder(&folder).unwrap();
        assert_eq!(report.missing_segments, vec!["f4w".to_string()]);
        assert_eq!(
            report.records,
            vec![ErrorRecord::new(
                SKU_17,
                "f4w",
                IssueKind::MissingMandatorySegments
            )]
        );
    }

    #[test]
    fn error_record_row_carries_label_and_hint() {
        let record = ErrorRecord::new(SKU_17, "a.JPG", IssueKind::ExtensionCase);
        assert_eq!(
            record.row(),
            [
                SKU_17,
                "a.JPG",
                "Extension case error",
                "Extension must be lowercase .jpg"
            ]
        );
    }
}
