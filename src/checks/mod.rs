pub mod extension_case;
pub mod filename_case;
pub mod rule_segment;

pub use extension_case::ExtensionCaseCheck;
pub use filename_case::FilenameCaseCheck;
pub use rule_segment::{RuleSegmentCheck, FILE_NAME_PATTERN};

use crate::rules::RuleSet;
use crate::validator::IssueKind;

/// What a check decided about a single file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Not an image; no further checks and no error.
    Skip,
    Issue(IssueKind),
    /// Name is well formed and its rule segment is authorised.
    Accept(String),
}

/// One link of the ordered per-file check chain. Returning `None` hands the
/// file to the next check; `Some` ends the chain for that file.
pub trait FileCheck {
    fn check(&self, file_name: &str, rules: &RuleSet) -> Option<Verdict>;
    fn description(&self) -> &str;
}

/// The checks in the order they must run.
pub fn default_chain() -> Vec<Box<dyn FileCheck>> {
    vec![
        Box::new(ExtensionCaseCheck),
        Box::new(FilenameCaseCheck),
        Box::new(RuleSegmentCheck::new()),
    ]
}
