use crate::{
    config::Config,
    error::{DatasetError, Result},
};
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Sorted names of the date partitions directly under `root`.
pub fn list_partitions(cfg: &Config, root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(DatasetError::MissingRoot(root.to_path_buf()));
    }

    let include = if cfg.scan.include_pattern.is_empty() {
        None
    } else {
        Some(Regex::new(&cfg.scan.include_pattern)?)
    };

    let mut dates = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(re) = &include {
            if !re.is_match(&name) {
                debug!("skipping directory not matching include_pattern: {name}");
                continue;
            }
        }
        dates.push(name);
    }

    if dates.is_empty() {
        return Err(DatasetError::NoPartitions(root.to_path_buf()));
    }
    dates.sort();
    Ok(dates)
}
