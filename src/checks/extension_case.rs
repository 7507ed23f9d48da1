use super::{FileCheck, Verdict};
use crate::rules::RuleSet;
use crate::validator::IssueKind;

pub struct ExtensionCaseCheck;

impl FileCheck for ExtensionCaseCheck {
    fn check(&self, file_name: &str, _rules: &RuleSet) -> Option<Verdict> {
        if file_name.ends_with(".jpg") {
            return None;
        }

        if file_name.to_lowercase().ends_with(".jpg") {
            Some(Verdict::Issue(IssueKind::ExtensionCase))
        } else {
            Some(Verdict::Skip)
        }
    }

    fn description(&self) -> &str {
        "Requires the lowercase .jpg extension and skips non-image files"
    }
}
