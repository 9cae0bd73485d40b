use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::batch::SourcedContact;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SHEET_NAME: &str = "Contacts";
const MAX_COLUMN_WIDTH: usize = 50;

/// Output columns, in order.
pub const HEADERS: [&str; 8] = [
    "Company Name",
    "Company Website",
    "Contact Person",
    "Job Title",
    "LinkedIn Profile",
    "Email Address",
    "Source PDF",
    "Last Updated",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

fn row(c: &SourcedContact) -> [String; 8] {
    let r = &c.contact;
    [
        r.company_name.clone(),
        r.website.clone(),
        r.contact_name.clone(),
        r.job_title.clone(),
        r.social_profile.clone(),
        r.email.clone(),
        c.source_document.clone(),
        c.extracted_at.format(TIMESTAMP_FORMAT).to_string(),
    ]
}

/// Write contacts in the fixed column order; creates the parent directory.
pub fn export(contacts: &[SourcedContact], path: &Path, format: ExportFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    match format {
        ExportFormat::Xlsx => write_xlsx(contacts, path)?,
        ExportFormat::Csv => write_csv(contacts, path)?,
        ExportFormat::Json => write_json(contacts, path)?,
    }
    info!("Successfully exported {} contacts to {}", contacts.len(), path.display());
    Ok(())
}

/// One sheet: bold header row frozen in place, columns sized to their
/// longest value (capped).
pub fn write_xlsx(contacts: &[SourcedContact], path: &Path) -> Result<()> {
    let rows: Vec<[String; 8]> = contacts.iter().map(row).collect();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, cells) in rows.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string(i as u32 + 1, col as u16, value)?;
        }
    }

    for (col, header) in HEADERS.iter().enumerate() {
        let longest = rows
            .iter()
            .map(|r| r[col].chars().count())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
        sheet.set_column_width(col as u16, (longest + 2).min(MAX_COLUMN_WIDTH) as f64)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook {:?}", path))?;
    Ok(())
}

pub fn write_csv(contacts: &[SourcedContact], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {:?}", path))?;
    writer.write_record(HEADERS)?;
    for contact in contacts {
        writer.write_record(row(contact))?;
    }
    writer.flush()?;
    Ok(())
}

/// JSON array of objects keyed by the column headers.
pub fn write_json(contacts: &[SourcedContact], path: &Path) -> Result<()> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = contacts
        .iter()
        .map(|c| {
            HEADERS
                .iter()
                .zip(row(c))
                .map(|(h, v)| (h.to_string(), serde_json::Value::String(v)))
                .collect()
        })
        .collect();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create JSON file {:?}", path))?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.flush()?;
    Ok(())
}
