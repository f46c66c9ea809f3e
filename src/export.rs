use crate::{
    aggregate::{at_risk, AtRiskRow},
    config::Config,
    dataset::Dataset,
    table::Table,
    util::{ensure_dir, now_rfc3339, sha256_hex},
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const AT_RISK_HEADER: [&str; 3] = ["health_status", "latitude", "longitude"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportIndex {
    pub generated: String,
    pub date: String,
    pub files: Vec<ExportedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFile {
    pub file: String,
    pub rows: usize,
    pub sha256: String,
}

pub fn at_risk_csv(rows: &[AtRiskRow]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(AT_RISK_HEADER)?;
    for r in rows {
        wtr.write_record([&r.health_status, &r.latitude, &r.longitude])?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("flushing at-risk CSV: {}", e.error()))
}

pub fn table_csv(table: &Table) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("flushing CSV: {}", e.error()))
}

pub fn at_risk_filename(cfg: &Config, date: &str) -> String {
    format!("{date}{}", cfg.output.at_risk_suffix)
}

/// Writes the at-risk subset for `date` and every palm row into `out_dir`,
/// plus `index.json` when enabled.
pub fn write_exports(cfg: &Config, ds: &Dataset, date: &str, out_dir: &Path) -> Result<ExportIndex> {
    ensure_dir(out_dir)?;

    let risky = at_risk(&ds.palms_for(date)?);
    let palms = ds.palms();
    let outputs = [
        (at_risk_filename(cfg, date), at_risk_csv(&risky)?, risky.len()),
        (cfg.output.all_palms_filename.clone(), table_csv(&palms)?, palms.len()),
    ];

    let mut files = Vec::new();
    for (name, bytes, rows) in outputs {
        let path = out_dir.join(&name);
        std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} ({rows} rows)", path.display());
        files.push(ExportedFile {
            file: name,
            rows,
            sha256: sha256_hex(&bytes),
        });
    }

    let index = ExportIndex {
        generated: now_rfc3339(),
        date: date.to_string(),
        files,
    };
    if cfg.output.write_index_json {
        std::fs::write(out_dir.join("index.json"), serde_json::to_string_pretty(&index)?)?;
    }
    Ok(index)
}
