use super::{FileCheck, Verdict};
use crate::rules::RuleSet;
use crate::validator::IssueKind;
use regex::Regex;

/// Naming contract for image files: `<keyword-segment>-<rule-segment>.jpg`.
///
/// - keyword segment: lowercase letters and hyphens
/// - rule segment (captured as `segment`): lowercase letters, digits, dots, hyphens
/// - extension: literal lowercase `.jpg`
///
/// The keyword segment is greedy, so `pipe-shelves-m100-1.2w.jpg` captures
/// `m100-1.2w`: the keyword cannot absorb `m100` because it contains digits.
pub const FILE_NAME_PATTERN: &str = r"^[a-z-]+-(?P<segment>[a-z0-9.-]+)\.jpg$";

pub struct RuleSegmentCheck {
    pattern: Regex,
}

impl Default for RuleSegmentCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSegmentCheck {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(FILE_NAME_PATTERN).expect("file name pattern is valid"),
        }
    }

    /// The rule segment of a well-formed file name.
    pub fn segment<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(file_name)
            .and_then(|caps| caps.name("segment"))
            .map(|m| m.as_str())
    }
}

impl FileCheck for RuleSegmentCheck {
    fn check(&self, file_name: &str, rules: &RuleSet) -> Option<Verdict> {
        let verdict = match self.segment(file_name) {
            None => Verdict::Issue(IssueKind::NamingStructure),
            Some(segment) if !rules.contains(segment) => {
                Verdict::Issue(IssueKind::UnauthorizedRuleSegment)
            }
            Some(segment) => Verdict::Accept(segment.to_string()),
        };
        Some(verdict)
    }

    fn description(&self) -> &str {
        "Matches the keyword/rule-segment structure and checks the segment allow-list"
    }
}
