use crate::report::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "skucheck")]
#[command(about = "Validates image naming inside SKU folders and reports violations")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Folder holding the SKU subfolders (defaults to ~/Desktop/ImgNameCheck)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Rule file, one rule segment per line (defaults to ~/Desktop/withoutLogo_ImgName_rules.txt)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// TOML configuration file (defaults to ~/Desktop/skucheck.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Only report; do not prefix invalid folders with INVALID_
    #[arg(long)]
    pub report_only: bool,

    /// Skip moving stray images and trimming folder suffixes
    #[arg(long)]
    pub skip_normalize: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a zip archive of SKU folders in a temporary directory
    CheckArchive {
        /// Path to the zip archive
        #[arg(
            value_name = "ARCHIVE",
            conflicts_with = "url",
            required_unless_present = "url"
        )]
        archive: Option<PathBuf>,

        /// Fetch the zip archive from an http(s) URL instead
        #[arg(
            long,
            value_name = "URL",
            conflicts_with = "archive",
            required_unless_present = "archive"
        )]
        url: Option<String>,

        /// Rule file, one rule segment per line
        #[arg(long, value_name = "FILE")]
        rules: PathBuf,

        /// Where to write the report (defaults to image_naming_report.<format>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Xlsx)]
        format: ReportFormat,
    },
}
