use crate::validator::ErrorRecord;
use anyhow::{Context, Result};
use clap::ValueEnum;
use csv::Writer;
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const REPORT_HEADERS: [&str; 4] = ["Folder", "Problem File", "Error Type", "Correct Example"];

pub const SHEET_NAME: &str = "Lowercase Validation Report";

pub const REPORT_STEM: &str = "image_naming_report";

const HEADER_FILL: u32 = 0xFFFF00;

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Excel workbook with a highlighted header row
    #[default]
    Xlsx,
    /// Plain CSV with the same columns
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("{}.{}", REPORT_STEM, self.extension())
    }
}

/// Writes one row per record. Nothing is written when there are no records.
pub fn write_report(
    records: &[ErrorRecord],
    path: &Path,
    format: ReportFormat,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }

    match format {
        ReportFormat::Xlsx => write_xlsx(records, path)?,
        ReportFormat::Csv => write_csv(records, path)?,
    }

    Ok(Some(path.to_path_buf()))
}

fn write_xlsx(records: &[ErrorRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL));

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, value) in record.row().iter().enumerate() {
            sheet.write_string(row, col as u16, *value)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save report {}", path.display()))?;
    Ok(())
}

fn write_csv(records: &[ErrorRecord], path: &Path) -> Result<()> {
    let output_file = File::create(path).context("Failed to create report file")?;
    let mut writer = Writer::from_writer(output_file);

    writer.write_record(REPORT_HEADERS)?;
    for record in records {
        writer.write_record(record.row())?;
    }

    writer.flush()?;
    Ok(())
}
