use crate::{
    aggregate::{self, AtRiskRow, DistributionEntry, Kpis, ResiMean, TimeSeries},
    assets::{date_assets, DateAssets},
    config::Config,
    dataset::Dataset,
    error::Result,
};
use serde::{Deserialize, Serialize};

/// Everything a dashboard shows for one selected date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateReport {
    pub date: String,
    pub available_dates: Vec<String>,
    pub skipped_dates: Vec<String>,
    pub kpis: Kpis,
    pub distribution: Vec<DistributionEntry>,
    pub resi_means: Option<Vec<ResiMean>>,
    pub at_risk: Vec<AtRiskRow>,
    pub assets: DateAssets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub dates: Vec<String>,
    pub time_series: TimeSeries,
}

impl DateReport {
    pub fn build(cfg: &Config, ds: &Dataset, date: &str) -> Result<Self> {
        let palms = ds.palms_for(date)?;
        Ok(Self {
            date: date.to_string(),
            available_dates: ds.dates.clone(),
            skipped_dates: ds.skipped.clone(),
            kpis: aggregate::kpis(&palms),
            distribution: aggregate::distribution(&palms),
            resi_means: aggregate::resi_means(&palms),
            at_risk: aggregate::at_risk(&palms),
            assets: date_assets(cfg, &ds.root, date),
        })
    }
}

impl TrendReport {
    pub fn build(ds: &Dataset) -> Self {
        Self {
            dates: ds.loaded.clone(),
            time_series: aggregate::time_series(ds),
        }
    }
}
