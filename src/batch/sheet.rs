//! JSON workbook model
//!
//! A workbook is an ordered list of worksheets; each worksheet carries its
//! column names and string rows. Rows may be shorter than the column list,
//! missing cells read as empty. Non-string cells in the file are read as
//! text, with `null` as an empty cell.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::errors::{RfpError, Result};

/// Ordered collection of worksheets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Worksheet>,
}

/// Single worksheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_rows")]
    pub rows: Vec<Vec<String>>,
}

fn deserialize_rows<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Vec<Vec<Value>> = Vec::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl Workbook {
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Self { sheets }
    }

    /// Load a workbook; column names are trimmed
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RfpError::DocumentError(format!("Failed to read workbook {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let mut workbook: Workbook = serde_json::from_str(contents)?;
        for sheet in &mut workbook.sheets {
            sheet.normalize_columns();
        }
        Ok(workbook)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Worksheet {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn normalize_columns(&mut self) {
        for column in &mut self.columns {
            *column = column.trim().to_string();
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Index of `name`, appending an empty column if it is missing
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.columns.push(name.to_string());
        self.columns.len() - 1
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write one cell, growing the sheet when the row or column is new
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if self.columns.len() <= column {
            self.columns.resize(column + 1, String::new());
        }
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.into();
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
