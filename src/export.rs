//! Spreadsheet and CSV serialization of a [`Table`]

use crate::config::{ExportConfig, MAX_CELL_CHARS};
use crate::error::Result;
use crate::table::{COLUMNS, ELLIPSIS, SummaryValue, Table, truncate_cell};
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sheet name of the single-sheet export
pub const SHEET_NAME: &str = "Emails";
/// Sheet names of the two-sheet export
pub const DETAILS_SHEET_NAME: &str = "Email Details";
pub const SUMMARY_SHEET_NAME: &str = "Summary";

/// Width used for columns without a configured width
pub const DEFAULT_COLUMN_WIDTH: f64 = 15.0;

const HEADER_FILL: u32 = 0x0044_72C4;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column width in characters, keyed by column name
#[must_use]
pub fn column_width(column: &str) -> f64 {
    match column {
        "Date" => 20.0,
        "From" | "To" | "Attachments" => 30.0,
        "Subject" => 40.0,
        "Body" => 60.0,
        _ => DEFAULT_COLUMN_WIDTH,
    }
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_font_size(11)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

fn cell_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

/// Writes tables to `.xlsx` and `.csv`
///
/// File-writing methods take an optional name. Without one a name is
/// generated from the configured prefix and the current time; the
/// extension is appended when missing and relative names land in the
/// configured output directory.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    #[must_use]
    pub const fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Resolve the output path for an export
    #[must_use]
    pub fn output_path(&self, name: Option<&str>, extension: &str) -> PathBuf {
        let suffix = format!(".{extension}");
        let file_name = match name {
            Some(name) if name.ends_with(&suffix) => name.to_string(),
            Some(name) => format!("{name}{suffix}"),
            None => format!(
                "{}_{}{suffix}",
                self.config.file_prefix,
                Local::now().format("%Y%m%d_%H%M%S")
            ),
        };
        self.config.output_dir.join(file_name)
    }

    /// Single-sheet spreadsheet as bytes
    pub fn spreadsheet_bytes(&self, table: &Table) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.details_sheet(table, SHEET_NAME)?);
        Ok(workbook.save_to_buffer()?)
    }

    /// Write a single-sheet spreadsheet and return its path
    pub fn write_spreadsheet(&self, table: &Table, name: Option<&str>) -> Result<PathBuf> {
        let path = self.output_path(name, "xlsx");
        write_file(&path, &self.spreadsheet_bytes(table)?)?;
        info!("Exported {} emails to {}", table.len(), path.display());
        Ok(path)
    }

    /// Details and summary sheets as bytes
    pub fn summary_spreadsheet_bytes(&self, table: &Table) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.details_sheet(table, DETAILS_SHEET_NAME)?);
        workbook.push_worksheet(Self::summary_sheet(table)?);
        Ok(workbook.save_to_buffer()?)
    }

    /// Write a spreadsheet with details and summary sheets
    pub fn write_spreadsheet_with_summary(
        &self,
        table: &Table,
        name: Option<&str>,
    ) -> Result<PathBuf> {
        let path = self.output_path(name, "xlsx");
        write_file(&path, &self.summary_spreadsheet_bytes(table)?)?;
        info!(
            "Exported {} emails with summary to {}",
            table.len(),
            path.display()
        );
        Ok(path)
    }

    /// Serialize as UTF-8 CSV with a byte order mark
    #[allow(clippy::unused_self)]
    pub fn write_csv_to<W: Write>(&self, table: &Table, mut writer: W) -> Result<()> {
        writer.write_all(UTF8_BOM)?;

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(COLUMNS)?;
        for row in table.rows() {
            csv.write_record(row.cells())?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn csv_bytes(&self, table: &Table) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_csv_to(table, &mut buffer)?;
        Ok(buffer)
    }

    /// Write a CSV file and return its path
    pub fn write_csv(&self, table: &Table, name: Option<&str>) -> Result<PathBuf> {
        let path = self.output_path(name, "csv");
        write_file(&path, &self.csv_bytes(table)?)?;
        info!("Exported {} emails to {}", table.len(), path.display());
        Ok(path)
    }

    fn details_sheet(&self, table: &Table, name: &str) -> Result<Worksheet> {
        let header = header_format();
        let cell = cell_format();

        let mut sheet = Worksheet::new();
        sheet.set_name(name)?;
        write_header(&mut sheet, &COLUMNS, &header)?;

        for (index, row) in table.rows().iter().enumerate() {
            let row_num = sheet_row(index + 1);
            for (col, value) in row
                .spreadsheet_cells(self.config.body_limit)
                .iter()
                .enumerate()
            {
                // Any column can outgrow a cell, not just the body
                let value = truncate_cell(value, MAX_CELL_CHARS - ELLIPSIS.len());
                sheet.write_string_with_format(row_num, sheet_col(col), &*value, &cell)?;
            }
        }

        for (col, column) in COLUMNS.iter().enumerate() {
            sheet.set_column_width(sheet_col(col), column_width(column))?;
        }
        sheet.set_freeze_panes(1, 0)?;

        Ok(sheet)
    }

    fn summary_sheet(table: &Table) -> Result<Worksheet> {
        let header = header_format();
        let summary = table.summary();

        let mut sheet = Worksheet::new();
        sheet.set_name(SUMMARY_SHEET_NAME)?;
        write_header(&mut sheet, &["Metric", "Value"], &header)?;

        for (index, (metric, value)) in summary.metrics().into_iter().enumerate() {
            let row_num = sheet_row(index + 1);
            sheet.write_string(row_num, 0, metric)?;
            match value {
                #[allow(clippy::cast_precision_loss)]
                SummaryValue::Count(count) => {
                    sheet.write_number(row_num, 1, count as f64)?;
                }
                SummaryValue::Text(text) => {
                    sheet.write_string(row_num, 1, text)?;
                }
            }
        }

        sheet.set_column_width(0, 25)?;
        sheet.set_column_width(1, 45)?;
        sheet.set_freeze_panes(1, 0)?;

        Ok(sheet)
    }
}

fn write_header(sheet: &mut Worksheet, columns: &[&str], format: &Format) -> Result<()> {
    for (col, column) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, sheet_col(col), *column, format)?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
const fn sheet_row(index: usize) -> u32 {
    index as u32
}

#[allow(clippy::cast_possible_truncation)]
const fn sheet_col(index: usize) -> u16 {
    index as u16
}

/// Write a finished buffer, removing the file if the write fails midway
fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let result = fs::File::create(path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });

    if let Err(e) = result {
        warn!("Failed to write {}: {}", path.display(), e);
        fs::remove_file(path).ok();
        return Err(e.into());
    }
    Ok(())
}
