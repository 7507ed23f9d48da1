use crate::report::ReportFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "skucheck.toml";
pub const DEFAULT_IMAGE_DIR: &str = "ImgNameCheck";
pub const DEFAULT_RULE_FILE: &str = "withoutLogo_ImgName_rules.txt";

/// Optional settings read from `skucheck.toml`. Every key may be omitted.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub image_root: Option<PathBuf>,
    pub rule_file: Option<PathBuf>,
    pub report_name: Option<String>,
    pub report_format: Option<ReportFormat>,
    pub mark_invalid: Option<bool>,
    pub normalize: Option<bool>,
}

impl FileConfig {
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Failed to read configuration from {}",
                path.as_ref().display()
            )
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("Failed to parse configuration")
    }

    /// Reads the explicit config file, or the one on the desktop if it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_toml_path(path),
            None => {
                let candidate = desktop_dir().join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    Self::from_toml_path(candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub image_root: Option<PathBuf>,
    pub rule_file: Option<PathBuf>,
    pub report_format: Option<ReportFormat>,
    pub report_only: bool,
    pub skip_normalize: bool,
}

/// Fully resolved settings for a standalone run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub image_root: PathBuf,
    pub rule_file: PathBuf,
    pub report_path: PathBuf,
    pub report_format: ReportFormat,
    pub mark_invalid: bool,
    pub normalize: bool,
}

impl RunConfig {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        Self::resolve_with_desktop(file, overrides, &desktop_dir())
    }

    pub fn resolve_with_desktop(file: FileConfig, overrides: Overrides, desktop: &Path) -> Self {
        let image_root = overrides
            .image_root
            .or(file.image_root)
            .unwrap_or_else(|| desktop.join(DEFAULT_IMAGE_DIR));
        let rule_file = overrides
            .rule_file
            .or(file.rule_file)
            .unwrap_or_else(|| desktop.join(DEFAULT_RULE_FILE));
        let report_format = overrides
            .report_format
            .or(file.report_format)
            .unwrap_or_default();
        let report_name = file
            .report_name
            .unwrap_or_else(|| report_format.default_file_name());

        Self {
            report_path: image_root.join(report_name),
            image_root,
            rule_file,
            report_format,
            mark_invalid: !overrides.report_only && file.mark_invalid.unwrap_or(true),
            normalize: !overrides.skip_normalize && file.normalize.unwrap_or(true),
        }
    }
}

/// The user's desktop, falling back to `~/Desktop` where the platform has no
/// registered desktop directory.
pub fn desktop_dir() -> PathBuf {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .unwrap_or_else(|| PathBuf::from("Desktop"))
}
