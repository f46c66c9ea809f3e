use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A pre-rendered image for one date. `placeholder` is set when the file
/// is missing and holds the message shown in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub caption: String,
    pub path: PathBuf,
    pub exists: bool,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateAssets {
    pub health_map: ImageAsset,
    pub heatmaps: Vec<ImageAsset>,
}

pub fn health_map_path(cfg: &Config, root: &Path, date: &str) -> PathBuf {
    root.join(date)
        .join(&cfg.dataset.visualizations_dir)
        .join(format!("{date}_health_grid.png"))
}

pub fn heatmap_path(root: &Path, date: &str, index: &str) -> PathBuf {
    root.join(date).join(format!("{date}_{index}_grid1.png"))
}

pub fn date_assets(cfg: &Config, root: &Path, date: &str) -> DateAssets {
    let health_map = asset(
        "Health Grid Map".to_string(),
        health_map_path(cfg, root, date),
        "No health map found for this date.".to_string(),
    );
    let heatmaps = cfg
        .dataset
        .index_names
        .iter()
        .map(|index| {
            asset(
                format!("{index} Grid Heatmap"),
                heatmap_path(root, date, index),
                format!("{index} heatmap not found."),
            )
        })
        .collect();
    DateAssets {
        health_map,
        heatmaps,
    }
}

fn asset(caption: String, path: PathBuf, missing: String) -> ImageAsset {
    let exists = path.is_file();
    if !exists {
        debug!("image not found: {}", path.display());
    }
    ImageAsset {
        caption,
        path,
        exists,
        placeholder: (!exists).then_some(missing),
    }
}
