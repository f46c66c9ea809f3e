use crate::{
    dataset::Dataset,
    health::{color_for, HealthStatus},
    table::{
        cell, numeric, Table, DATE_COLUMN, HEALTH_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN,
        RESI_COLUMN,
    },
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpis {
    pub healthy: usize,
    pub moderate: usize,
    pub unhealthy: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub health_status: String,
    pub count: usize,
    pub percent: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResiMean {
    pub health_status: String,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtRiskRow {
    pub health_status: String,
    pub latitude: String,
    pub longitude: String,
}

/// Date-indexed palm counts, one column per health label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub statuses: Vec<String>,
    pub rows: Vec<TimeSeriesRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub date: String,
    pub counts: Vec<usize>,
}

fn labels(palms: &Table) -> impl Iterator<Item = &str> {
    let idx = palms.column_index(HEALTH_COLUMN);
    palms.rows.iter().map(move |r| cell(r, idx))
}

/// Health counts over one date's palms (see [`Dataset::palms_for`]).
pub fn kpis(palms: &Table) -> Kpis {
    let count = |s: HealthStatus| labels(palms).filter(|l| *l == s.label()).count();
    Kpis {
        healthy: count(HealthStatus::Healthy),
        moderate: count(HealthStatus::Moderate),
        unhealthy: count(HealthStatus::Unhealthy),
        total: palms.len(),
    }
}

/// Label counts among one date's palms, largest first.
pub fn distribution(palms: &Table) -> Vec<DistributionEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for l in labels(palms) {
        *counts.entry(l).or_insert(0) += 1;
    }

    let total = palms.len();
    let mut out: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(label, count)| DistributionEntry {
            health_status: label.to_string(),
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
            color: color_for(label).to_string(),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Mean `resi` per label, labels ascending. `None` when there is no `resi` column.
pub fn resi_means(palms: &Table) -> Option<Vec<ResiMean>> {
    let resi_idx = palms.column_index(RESI_COLUMN)?;
    let health_idx = palms.column_index(HEALTH_COLUMN);

    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in &palms.rows {
        let acc = groups.entry(cell(row, health_idx)).or_insert((0.0, 0));
        if let Some(v) = numeric(row, Some(resi_idx)) {
            acc.0 += v;
            acc.1 += 1;
        }
    }

    Some(
        groups
            .into_iter()
            .map(|(label, (sum, n))| ResiMean {
                health_status: label.to_string(),
                mean: (n > 0).then(|| sum / n as f64),
            })
            .collect(),
    )
}

/// Moderate and Unhealthy palms of one date, stably sorted by label.
pub fn at_risk(palms: &Table) -> Vec<AtRiskRow> {
    let health_idx = palms.column_index(HEALTH_COLUMN);
    let lat_idx = palms.column_index(LATITUDE_COLUMN);
    let lon_idx = palms.column_index(LONGITUDE_COLUMN);
    if lat_idx.is_none() || lon_idx.is_none() {
        warn!("latitude/longitude columns missing; at-risk locations will be blank");
    }

    let mut out: Vec<AtRiskRow> = palms
        .rows
        .iter()
        .filter(|r| HealthStatus::is_at_risk_label(cell(r, health_idx)))
        .map(|r| AtRiskRow {
            health_status: cell(r, health_idx).to_string(),
            latitude: cell(r, lat_idx).to_string(),
            longitude: cell(r, lon_idx).to_string(),
        })
        .collect();
    out.sort_by(|a, b| a.health_status.cmp(&b.health_status));
    out
}

/// Palm counts per (date, label) over every loaded date, zero-filled.
pub fn time_series(ds: &Dataset) -> TimeSeries {
    let palms = ds.palms();
    let date_idx = palms.column_index(DATE_COLUMN);
    let health_idx = palms.column_index(HEALTH_COLUMN);

    let mut pairs: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut statuses: Vec<String> = Vec::new();
    for row in &palms.rows {
        let label = cell(row, health_idx);
        if label.is_empty() {
            continue;
        }
        *pairs.entry((cell(row, date_idx), label)).or_insert(0) += 1;
        if !statuses.iter().any(|s| s == label) {
            statuses.push(label.to_string());
        }
    }
    statuses.sort();

    let rows = ds
        .loaded
        .iter()
        .map(|date| TimeSeriesRow {
            date: date.clone(),
            counts: statuses
                .iter()
                .map(|s| pairs.get(&(date.as_str(), s.as_str())).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    TimeSeries { statuses, rows }
}
