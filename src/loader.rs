use crate::{
    config::Config,
    error::{DatasetError, Result},
    table::{Table, CLASS_COLUMN, DATE_COLUMN},
};
use std::path::Path;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

/// Reads one partition's CSV. `Ok(None)` when the partition has no CSV.
pub fn load_partition(cfg: &Config, root: &Path, date: &str) -> Result<Option<Table>> {
    let path = root.join(date).join(&cfg.dataset.csv_filename);
    if !path.is_file() {
        warn!("no {} in partition {date}; skipping", cfg.dataset.csv_filename);
        return Ok(None);
    }

    let csv_err = |source| DatasetError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&path)
        .map_err(csv_err)?;

    let columns = dedupe_columns(rdr.headers().map_err(csv_err)?.iter().map(normalize_column));
    let mut table = Table::new(columns);

    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        if record.len() > table.columns.len() {
            return Err(DatasetError::ExtraFields {
                path: path.display().to_string(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: table.columns.len(),
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(str::to_string).collect());
    }

    if let Some(idx) = table.column_index(CLASS_COLUMN) {
        for row in &mut table.rows {
            row[idx] = row[idx].to_lowercase();
        }
    }
    table.set_constant(DATE_COLUMN, date);

    debug!(rows = table.len(), "loaded partition {date}");
    Ok(Some(table))
}

/// NFKC, byte-order mark stripped, trimmed, lowercased.
pub fn normalize_column(raw: &str) -> String {
    raw.nfkc()
        .collect::<String>()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
}

/// Suffixes repeated names `.1`, `.2`, ... so no column shadows another.
pub fn dedupe_columns<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}
