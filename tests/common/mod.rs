#![allow(dead_code)]

use palm_health::aggregate::TimeSeries;
use std::path::Path;

pub fn write_partition(root: &Path, date: &str, csv: &str) {
    let dir = root.join(date);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("classified_index.csv"), csv).unwrap();
}

pub fn empty_partition(root: &Path, date: &str) {
    std::fs::create_dir_all(root.join(date)).unwrap();
}

/// Two surveyed dates plus one folder without a CSV.
pub fn sample_tree(root: &Path) {
    write_partition(
        root,
        "2024-01-01",
        " Class ,NDVI,RESI,Latitude,Longitude\n\
         Palm,0.75,2.0,1.10,103.10\n\
         PALM,0.45,1.0,1.20,103.20\n\
         palm,0.1,0.5,1.30,103.30\n\
         Soil,0.05,,1.40,103.40\n",
    );
    write_partition(
        root,
        "2024-02-01",
        "class,ndvi,resi,latitude,longitude\n\
         palm,0.65,2.5,1.11,103.11\n\
         palm,0.62,,1.21,103.21\n\
         soil,0.2,0.1,1.31,103.31\n",
    );
    empty_partition(root, "2024-03-01");
}

pub fn series_count(ts: &TimeSeries, date: &str, status: &str) -> Option<usize> {
    let col = ts.statuses.iter().position(|s| s == status)?;
    let row = ts.rows.iter().find(|r| r.date == date)?;
    row.counts.get(col).copied()
}
