pub mod archive;
pub mod checks;
pub mod cli;
pub mod config;
pub mod normalizer;
pub mod report;
pub mod rules;
pub mod validator;

pub use archive::{check_archive, extract_zip, fetch_archive, ArchiveOutcome};
pub use checks::{FileCheck, Verdict, FILE_NAME_PATTERN};
pub use cli::{Cli, Commands};
pub use config::{FileConfig, Overrides, RunConfig};
pub use normalizer::{move_and_prune, strip_sku_suffixes, NormalizeStats, RenameStats};
pub use report::{write_report, ReportFormat};
pub use rules::{RuleError, RuleSet, MANDATORY_SEGMENTS};
pub use validator::{
    ErrorRecord, FolderReport, IssueKind, ValidationSummary, Validator, INVALID_PREFIX,
};
