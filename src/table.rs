use serde::{Deserialize, Serialize};

/// Name of the column every loaded row is tagged with.
pub const DATE_COLUMN: &str = "__date__";
pub const CLASS_COLUMN: &str = "class";
pub const NDVI_COLUMN: &str = "ndvi";
pub const RESI_COLUMN: &str = "resi";
pub const HEALTH_COLUMN: &str = "health_status";
pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Column-ordered string table. Cells keep the text they were read with;
/// an empty cell stands for a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Pushes a row, padding short rows with empty cells.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Appends a column computed from each row.
    pub fn add_column<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(&[String]) -> String,
    {
        for row in &mut self.rows {
            let value = f(row);
            row.push(value);
        }
        self.columns.push(name.to_string());
    }

    /// Sets `name` to `value` on every row, adding the column when absent.
    pub fn set_constant(&mut self, name: &str, value: &str) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => self.add_column(name, |_| value.to_string()),
        }
    }

    pub fn filter<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[String]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Outer concatenation: columns in order of first appearance, cells a
    /// table lacks are left empty.
    pub fn union(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for t in &tables {
            for c in &t.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }

        let mut out = Table::new(columns);
        for t in tables {
            let mapping: Vec<Option<usize>> =
                out.columns.iter().map(|c| t.column_index(c)).collect();
            for row in t.rows {
                let merged = mapping
                    .iter()
                    .map(|m| m.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect();
                out.rows.push(merged);
            }
        }
        out
    }
}

/// Cell text at `idx`, empty when the column is absent.
pub fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

/// Numeric value of a cell; empty or unparsable text is `None`.
pub fn numeric(row: &[String], idx: Option<usize>) -> Option<f64> {
    let raw = cell(row, idx).trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| !v.is_nan())
}
