//! Exporter: writes a job's results as JSON, CSV or XLSX
//!
//! JSON holds one primitive value per result entry, in unit order. The
//! tabular formats need every outcome to be a table; the tables are
//! coalesced first and the export fails if that is not possible.

use super::table::{Table, coalesce};
use super::types::ResultEntry;
use crate::utils::error::{EngineError, Result};
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Export target format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structured text
    Json,
    /// Delimited text
    Csv,
    /// Spreadsheet
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Whether results must be coalesced into one table first
    pub fn is_tabular(&self) -> bool {
        !matches!(self, ExportFormat::Json)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            _ => Err(EngineError::unsupported_format(s)),
        }
    }
}

/// Encode `entries` (already sorted by unit index); returns the bytes and the record count
pub(crate) fn encode(entries: &[ResultEntry], format: ExportFormat) -> Result<(Vec<u8>, usize)> {
    match format {
        ExportFormat::Json => {
            let values: Vec<Value> = entries.iter().map(|e| e.outcome.to_primitive()).collect();
            Ok((serde_json::to_vec_pretty(&values)?, values.len()))
        }
        ExportFormat::Csv | ExportFormat::Xlsx => {
            let table = coalesce(entries.iter().map(|e| (e.unit_index, &e.outcome)))?;
            let bytes = if format == ExportFormat::Csv {
                encode_csv(&table)?
            } else {
                encode_xlsx(&table)?
            };
            Ok((bytes, table.len()))
        }
    }
}

/// Encode and write to `path`
pub(crate) async fn write_export(
    path: &Path,
    entries: &[ResultEntry],
    format: ExportFormat,
) -> Result<usize> {
    let (bytes, records) = encode(entries, format)?;
    debug!(path = %path.display(), %format, bytes = bytes.len(), "Writing export");
    tokio::fs::write(path, bytes).await?;
    Ok(records)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode_csv(table: &Table) -> Result<Vec<u8>> {
    if table.columns().is_empty() {
        return Ok(Vec::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(cell_text))?;
    }
    writer
        .into_inner()
        .map_err(|e| EngineError::export(format!("Failed to flush CSV output: {}", e)))
}

fn encode_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string(0, xlsx_col(col)?, name)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1)
            .map_err(|_| EngineError::export("Too many rows for a spreadsheet"))?;
        for (col, value) in row.iter().enumerate() {
            let col = xlsx_col(col)?;
            match value {
                Value::Null => {}
                Value::Bool(b) => {
                    sheet.write_boolean(row_num, col, *b)?;
                }
                Value::Number(n) => match n.as_f64() {
                    Some(f) => {
                        sheet.write_number(row_num, col, f)?;
                    }
                    None => {
                        sheet.write_string(row_num, col, n.to_string())?;
                    }
                },
                other => {
                    sheet.write_string(row_num, col, cell_text(other))?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn xlsx_col(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| EngineError::export("Too many columns for a spreadsheet"))
}
