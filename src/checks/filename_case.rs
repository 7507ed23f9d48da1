use super::{FileCheck, Verdict};
use crate::rules::RuleSet;
use crate::validator::IssueKind;

pub struct FilenameCaseCheck;

impl FileCheck for FilenameCaseCheck {
    fn check(&self, file_name: &str, _rules: &RuleSet) -> Option<Verdict> {
        if file_name != file_name.to_lowercase() {
            Some(Verdict::Issue(IssueKind::FilenameCase))
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        "Rejects file names containing uppercase letters"
    }
}
