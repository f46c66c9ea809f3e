mod common;

use common::{empty_partition, sample_tree, write_partition};
use palm_health::{
    config::Config,
    dataset::Dataset,
    error::DatasetError,
    loader::{dedupe_columns, load_partition, normalize_column},
    scan::list_partitions,
};

#[test]
fn scanner_sorts_and_ignores_files() {
    let dir = tempfile::tempdir().unwrap();
    empty_partition(dir.path(), "2024-05-01");
    empty_partition(dir.path(), "2024-01-01");
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let dates = list_partitions(&Config::default(), dir.path()).unwrap();
    assert_eq!(dates, vec!["2024-01-01", "2024-05-01"]);
}

#[test]
fn scanner_applies_include_pattern() {
    let dir = tempfile::tempdir().unwrap();
    empty_partition(dir.path(), "2024-01-01");
    empty_partition(dir.path(), "scratch");

    let mut cfg = Config::default();
    cfg.scan.include_pattern = r"^\d{4}-\d{2}-\d{2}$".into();
    let dates = list_partitions(&cfg, dir.path()).unwrap();
    assert_eq!(dates, vec!["2024-01-01"]);
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = list_partitions(&Config::default(), &dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, DatasetError::MissingRoot(_)));
}

#[test]
fn empty_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::load(&Config::default(), dir.path()).unwrap_err();
    assert!(matches!(err, DatasetError::NoPartitions(_)));
}

#[test]
fn no_csv_anywhere_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    empty_partition(dir.path(), "2024-01-01");
    let err = Dataset::load(&Config::default(), dir.path()).unwrap_err();
    assert!(matches!(err, DatasetError::NoCsvFiles(_)));
}

#[test]
fn loader_normalizes_headers_and_class() {
    let dir = tempfile::tempdir().unwrap();
    sample_tree(dir.path());

    let t = load_partition(&Config::default(), dir.path(), "2024-01-01")
        .unwrap()
        .unwrap();
    assert_eq!(
        t.columns,
        vec!["class", "ndvi", "resi", "latitude", "longitude", "__date__"]
    );
    assert_eq!(t.rows[0][0], "palm");
    assert_eq!(t.rows[1][0], "palm");
    assert_eq!(t.rows[3][0], "soil");
    assert!(t.rows.iter().all(|r| r[5] == "2024-01-01"));
}

#[test]
fn loader_skips_missing_csv() {
    let dir = tempfile::tempdir().unwrap();
    sample_tree(dir.path());
    let t = load_partition(&Config::default(), dir.path(), "2024-03-01").unwrap();
    assert!(t.is_none());
}

#[test]
fn normalize_column_strips_bom_and_case() {
    assert_eq!(normalize_column("\u{feff} NDVI "), "ndvi");
    assert_eq!(normalize_column("Latitude"), "latitude");
}

#[test]
fn dataset_unions_and_records_skips() {
    let dir = tempfile::tempdir().unwrap();
    sample_tree(dir.path());

    let ds = Dataset::load(&Config::default(), dir.path()).unwrap();
    assert_eq!(ds.dates, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);
    assert_eq!(ds.loaded, vec!["2024-01-01", "2024-02-01"]);
    assert_eq!(ds.skipped, vec!["2024-03-01"]);
    assert_eq!(ds.table.len(), 7);
    assert!(ds.table.has_column("health_status"));
    assert_eq!(ds.palms().len(), 5);
}

#[test]
fn every_non_palm_row_is_soil() {
    let dir = tempfile::tempdir().unwrap();
    sample_tree(dir.path());
    let ds = Dataset::load(&Config::default(), dir.path()).unwrap();

    let class = ds.table.column_index("class").unwrap();
    let health = ds.table.column_index("health_status").unwrap();
    for row in &ds.table.rows {
        if row[class] != "palm" {
            assert_eq!(row[health], "Soil");
        }
    }
}

#[test]
fn missing_ndvi_without_health_status_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_partition(dir.path(), "2024-01-01", "class,resi\npalm,1.0\n");
    let err = Dataset::load(&Config::default(), dir.path()).unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumn(c) if c == "ndvi"));
}

#[test]
fn precomputed_health_status_is_used() {
    let dir = tempfile::tempdir().unwrap();
    write_partition(
        dir.path(),
        "2024-01-01",
        "class,health_status\npalm,Moderate\n",
    );
    let ds = Dataset::load(&Config::default(), dir.path()).unwrap();
    let palms = ds.palms_for("2024-01-01").unwrap();
    assert_eq!(palms.rows[0][1], "Moderate");
}

#[test]
fn unknown_date_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    sample_tree(dir.path());
    let ds = Dataset::load(&Config::default(), dir.path()).unwrap();
    let err = ds.palms_for("1999-01-01").unwrap_err();
    assert!(matches!(err, DatasetError::UnknownDate(_)));
    assert!(ds.palms_for("2024-03-01").unwrap().is_empty());
}

#[test]
fn overlong_rows_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_partition(dir.path(), "2024-01-01", "class,ndvi\npalm,0.7,EXTRA,MORE\n");
    let err = load_partition(&Config::default(), dir.path(), "2024-01-01").unwrap_err();
    assert!(matches!(
        err,
        DatasetError::ExtraFields {
            expected: 2,
            found: 4,
            ..
        }
    ));
}

#[test]
fn short_rows_are_padded() {
    let dir = tempfile::tempdir().unwrap();
    write_partition(dir.path(), "2024-01-01", "class,ndvi,resi\npalm,0.7\n");
    let t = load_partition(&Config::default(), dir.path(), "2024-01-01")
        .unwrap()
        .unwrap();
    assert_eq!(t.rows[0], vec!["palm", "0.7", "", "2024-01-01"]);
}

#[test]
fn duplicate_headers_keep_both_columns() {
    let dir = tempfile::tempdir().unwrap();
    write_partition(dir.path(), "2024-01-01", "class,NDVI, ndvi\npalm,0.7,0.2\n");
    let t = load_partition(&Config::default(), dir.path(), "2024-01-01")
        .unwrap()
        .unwrap();
    assert_eq!(t.columns, vec!["class", "ndvi", "ndvi.1", "__date__"]);
    assert_eq!(t.rows[0][2], "0.2");
}

#[test]
fn dedupe_columns_skips_taken_suffixes() {
    let cols = dedupe_columns(["a", "a.1", "a", "a"].iter().map(|s| s.to_string()));
    assert_eq!(cols, vec!["a", "a.1", "a.2", "a.3"]);
}
