use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub scan: Scan,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub data_dir: String,
    pub out_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
            out_dir: "out".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub csv_filename: String,
    pub visualizations_dir: String,
    pub palm_class: String,
    pub index_names: Vec<String>,
}
impl Default for Dataset {
    fn default() -> Self {
        Self {
            csv_filename: "classified_index.csv".into(),
            visualizations_dir: "visualizations".into(),
            palm_class: "palm".into(),
            index_names: ["NDVI", "NDWI", "RESI", "SQRT(IR_R)", "GVI", "DVI", "RDVI"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// NDVI cut points; a palm is Healthy at or above `healthy_min_ndvi`,
/// Moderate at or above `moderate_min_ndvi`, Unhealthy below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub healthy_min_ndvi: f64,
    pub moderate_min_ndvi: f64,
}
impl Default for Classification {
    fn default() -> Self {
        Self {
            healthy_min_ndvi: 0.6,
            moderate_min_ndvi: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scan {
    /// Regex a directory name must match to count as a date partition.
    /// Empty accepts every subdirectory.
    pub include_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub all_palms_filename: String,
    pub at_risk_suffix: String,
    pub write_index_json: bool,
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            all_palms_filename: "all_palm_health_data.csv".into(),
            at_risk_suffix: "_at_risk_palm_locations.csv".into(),
            write_index_json: true,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
