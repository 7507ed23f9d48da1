use encoding_rs::WINDOWS_1252;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rule segments every valid SKU folder must cover between its images.
pub const MANDATORY_SEGMENTS: [&str; 9] = [
    "m100-1.2w",
    "f1w",
    "f2w",
    "f3w",
    "f4w",
    "f5w",
    "f6w",
    "m100-8w",
    "m100-9w",
];

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule file is missing mandatory entries: {}", missing.join(", "))]
    MissingMandatory { missing: Vec<String> },

    #[error("failed to read rule file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The allow-list of rule segments, lowercased on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    segments: BTreeSet<String>,
}

impl RuleSet {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RuleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&decode_rule_text(&bytes))
    }

    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let segments: BTreeSet<String> = text
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();

        let missing: Vec<String> = MANDATORY_SEGMENTS
            .iter()
            .filter(|segment| !segments.contains(**segment))
            .map(|segment| segment.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(RuleError::MissingMandatory { missing });
        }

        Ok(Self { segments })
    }

    pub fn contains(&self, segment: &str) -> bool {
        self.segments.contains(segment)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

/// Rule files saved by older editors are often Windows-1252 rather than UTF-8.
fn decode_rule_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
