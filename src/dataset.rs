use crate::{
    config::Config,
    error::{DatasetError, Result},
    health::assign_health,
    loader::load_partition,
    scan::list_partitions,
    table::{cell, Table, CLASS_COLUMN, DATE_COLUMN},
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Every partition under a data directory, unioned and classified.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub root: PathBuf,
    /// All scanned partitions, including ones without a CSV.
    pub dates: Vec<String>,
    /// Partitions whose CSV was read, in date order.
    pub loaded: Vec<String>,
    /// Partitions without a CSV.
    pub skipped: Vec<String>,
    pub table: Table,
    palm_class: String,
}

impl Dataset {
    pub fn load(cfg: &Config, root: &Path) -> Result<Self> {
        let dates = list_partitions(cfg, root)?;

        let mut tables = Vec::new();
        let mut loaded = Vec::new();
        let mut skipped = Vec::new();
        for date in &dates {
            match load_partition(cfg, root, date)? {
                Some(t) => {
                    tables.push(t);
                    loaded.push(date.clone());
                }
                None => skipped.push(date.clone()),
            }
        }

        if tables.is_empty() {
            return Err(DatasetError::NoCsvFiles(root.to_path_buf()));
        }

        let mut table = Table::union(tables);
        if !table.has_column(CLASS_COLUMN) {
            return Err(DatasetError::MissingColumn(CLASS_COLUMN.to_string()));
        }
        assign_health(cfg, &mut table)?;

        info!(
            "loaded {} rows from {} of {} partitions",
            table.len(),
            loaded.len(),
            dates.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            dates,
            loaded,
            skipped,
            table,
            palm_class: cfg.dataset.palm_class.clone(),
        })
    }

    pub fn check_date(&self, date: &str) -> Result<()> {
        if self.dates.iter().any(|d| d == date) {
            Ok(())
        } else {
            Err(DatasetError::UnknownDate(date.to_string()))
        }
    }

    /// All rows (palm or not) of one date.
    pub fn select_date(&self, date: &str) -> Result<Table> {
        self.check_date(date)?;
        let idx = self.table.column_index(DATE_COLUMN);
        Ok(self.table.filter(|row| cell(row, idx) == date))
    }

    /// Palm rows across every date.
    pub fn palms(&self) -> Table {
        let idx = self.table.column_index(CLASS_COLUMN);
        self.table.filter(|row| cell(row, idx) == self.palm_class)
    }

    /// Palm rows of one date.
    pub fn palms_for(&self, date: &str) -> Result<Table> {
        let selected = self.select_date(date)?;
        let idx = selected.column_index(CLASS_COLUMN);
        Ok(selected.filter(|row| cell(row, idx) == self.palm_class))
    }
}
