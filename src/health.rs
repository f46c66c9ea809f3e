use crate::{
    config::Config,
    error::{DatasetError, Result},
    table::{cell, numeric, Table, CLASS_COLUMN, HEALTH_COLUMN, NDVI_COLUMN},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Moderate,
    Unhealthy,
    Soil,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Moderate => "Moderate",
            HealthStatus::Unhealthy => "Unhealthy",
            HealthStatus::Soil => "Soil",
        }
    }

    pub fn is_at_risk_label(label: &str) -> bool {
        label == HealthStatus::Moderate.label() || label == HealthStatus::Unhealthy.label()
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chart colour for a health label; unknown labels are grey.
pub fn color_for(label: &str) -> &'static str {
    match label {
        "Healthy" => "#07af52",
        "Moderate" => "#faba08",
        "Unhealthy" => "#ec0505",
        _ => "#cccccc",
    }
}

/// Health of one observation. A palm with no usable NDVI compares below
/// every threshold and lands in Unhealthy.
pub fn classify(cfg: &Config, class: &str, ndvi: Option<f64>) -> HealthStatus {
    if class != cfg.dataset.palm_class {
        return HealthStatus::Soil;
    }
    match ndvi {
        Some(v) if v >= cfg.classification.healthy_min_ndvi => HealthStatus::Healthy,
        Some(v) if v >= cfg.classification.moderate_min_ndvi => HealthStatus::Moderate,
        _ => HealthStatus::Unhealthy,
    }
}

/// Derives `health_status` for every row that lacks one. A precomputed
/// label is kept; rows from partitions without the column (empty cells after
/// the union) are classified from `class` and `ndvi`.
pub fn assign_health(cfg: &Config, table: &mut Table) -> Result<()> {
    let class_idx = table.column_index(CLASS_COLUMN);
    let ndvi_idx = table.column_index(NDVI_COLUMN);

    let Some(health_idx) = table.column_index(HEALTH_COLUMN) else {
        let ndvi_idx =
            ndvi_idx.ok_or_else(|| DatasetError::MissingColumn(NDVI_COLUMN.to_string()))?;
        table.add_column(HEALTH_COLUMN, |row| {
            classify(cfg, cell(row, class_idx), numeric(row, Some(ndvi_idx)))
                .label()
                .to_string()
        });
        debug!(rows = table.len(), "derived {HEALTH_COLUMN}");
        return Ok(());
    };

    let mut filled = 0usize;
    for row in &mut table.rows {
        if !row[health_idx].trim().is_empty() {
            continue;
        }
        if ndvi_idx.is_none() {
            return Err(DatasetError::MissingColumn(NDVI_COLUMN.to_string()));
        }
        let label = classify(cfg, cell(row, class_idx), numeric(row, ndvi_idx));
        row[health_idx] = label.label().to_string();
        filled += 1;
    }
    info!("using precomputed {HEALTH_COLUMN} column, derived {filled} missing labels");
    Ok(())
}
