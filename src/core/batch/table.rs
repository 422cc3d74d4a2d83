//! Tabular values
//!
//! A [`Table`] is both the input of dataframe jobs and a possible processor
//! outcome. Coalescing concatenates tabular outcomes in unit order.

use super::outcome::Outcome;
use crate::utils::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named columns over rows of JSON cells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table, checking every row against the column count
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(columns);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Create a table from record objects; columns are the union of keys in first-seen order
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Builder-style row append
    pub fn with_row(mut self, row: Vec<Value>) -> Result<Self> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(EngineError::invalid_request(format!(
                "Row has {} cells but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row position and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)
    }

    /// One row as a record object
    pub fn record(&self, row: usize) -> Option<Map<String, Value>> {
        let cells = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
        )
    }

    /// All rows as record objects
    pub fn records(&self) -> impl Iterator<Item = Map<String, Value>> + '_ {
        (0..self.rows.len()).filter_map(|i| self.record(i))
    }

    /// JSON array of record objects
    pub fn to_records(&self) -> Value {
        Value::Array(self.records().map(Value::Object).collect())
    }

    /// Split into consecutive tables of at most `size` rows, sharing the column set
    pub(crate) fn split_rows(self, size: usize) -> Vec<Table> {
        let Table { columns, rows } = self;
        let mut chunks = Vec::with_capacity(rows.len().div_ceil(size.max(1)));
        let mut iter = rows.into_iter();
        loop {
            let part: Vec<Vec<Value>> = iter.by_ref().take(size.max(1)).collect();
            if part.is_empty() {
                break;
            }
            chunks.push(Table {
                columns: columns.clone(),
                rows: part,
            });
        }
        chunks
    }

    /// Concatenate tables; columns are unioned in first-seen order, missing cells are null
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Table {
        let tables: Vec<&Table> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let total_rows = tables.iter().map(|t| t.len()).sum();
        let mut rows = Vec::with_capacity(total_rows);
        for table in &tables {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|c| table.columns.iter().position(|tc| tc == c))
                .collect();
            for row in &table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|p| p.and_then(|i| row.get(i).cloned()).unwrap_or(Value::Null))
                        .collect(),
                );
            }
        }

        Table { columns, rows }
    }
}

/// Coalesce indexed outcomes into one table, in the order given
///
/// Fails with [`EngineError::NotCoalescible`] naming the first non-tabular outcome.
pub fn coalesce<'a>(outcomes: impl IntoIterator<Item = (usize, &'a Outcome)>) -> Result<Table> {
    let mut tables = Vec::new();
    for (unit_index, outcome) in outcomes {
        match outcome.as_table() {
            Some(table) => tables.push(table),
            None => {
                return Err(EngineError::not_coalescible(format!(
                    "outcome of unit {} is {}, not a table",
                    unit_index,
                    outcome.kind()
                )));
            }
        }
    }
    Ok(Table::concat(tables))
}
