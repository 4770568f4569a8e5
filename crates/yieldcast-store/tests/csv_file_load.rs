//! File-backed loading: real CSV files on disk, fallback to synthetic data,
//! and provenance reporting.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use yieldcast_core::FieldDefaults;
use yieldcast_store::{DataSource, RecordStore, load_csv_path};

fn temp_csv(name: &str, contents: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "yieldcast-store-{name}-{}-{now}.csv",
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("write csv fixture");
    path
}

fn cleanup(path: &Path) {
    let _ = std::fs::remove_file(path);
}

const FIXTURE: &str = "\
,Area,Item,Year,hg/ha_yield,average_rain_fall_mm_per_year,pesticides_tonnes,avg_temp
0,Albania,Maize,1990,36613,1485.0,121.0,16.37
1,Albania,Potatoes,1990,66667,1485.0,121.0,16.37
2,Albania,\"Rice, paddy\",1990,23333,1485.0,121.0,16.37
3,Algeria,Wheat,1991,,89.0,3.5,17.0
4,Algeria,Wheat,1992,8000,89.0,,17.0
5,Algeria,Wheat,1993,9000,89.0,3.5,hot
";

#[test]
fn loads_file_and_drops_malformed_rows() {
    let path = temp_csv("fixture", FIXTURE);
    let report = load_csv_path(&path, &FieldDefaults::default()).expect("fixture loads");

    assert_eq!(report.rows_seen, 6);
    assert_eq!(report.rows_skipped, 2);
    assert_eq!(report.store.len(), 4);
    assert_eq!(report.store.all_areas(), ["albania", "algeria"]);
    assert_eq!(
        report.store.all_crops(),
        ["maize", "potatoes", "rice, paddy", "wheat"]
    );
    assert_eq!(
        report.store.source(),
        &DataSource::File { path: path.clone() }
    );

    let algeria = report
        .store
        .iter()
        .find(|r| r.area == "algeria")
        .expect("one algeria row survives");
    assert_eq!(algeria.year, 1992);
    assert!((algeria.pesticides - 100.0).abs() < 1e-9);

    cleanup(&path);
}

#[test]
fn load_or_synthesize_prefers_readable_file() {
    let path = temp_csv("prefer", FIXTURE);
    let store = RecordStore::load_or_synthesize(&path, &FieldDefaults::default(), 42);
    assert_eq!(store.len(), 4);
    assert!(matches!(store.source(), DataSource::File { .. }));
    cleanup(&path);
}

#[test]
fn header_only_file_falls_back_to_synthetic() {
    let path = temp_csv("header-only", "Area,Item,hg/ha_yield\n");
    let store = RecordStore::load_or_synthesize(&path, &FieldDefaults::default(), 8);
    assert_eq!(store.source(), &DataSource::Synthetic { seed: 8 });
    assert_eq!(store.len(), 1400);
    cleanup(&path);
}

#[test]
fn missing_columns_fall_back_to_synthetic() {
    let path = temp_csv("bad-header", "Country,Crop,Yield\nIndia,Wheat,1\n");
    let store = RecordStore::load_or_synthesize(&path, &FieldDefaults::default(), 8);
    assert_eq!(store.source(), &DataSource::Synthetic { seed: 8 });
    cleanup(&path);
}

#[test]
fn synthetic_store_is_reproducible() {
    let a = RecordStore::synthetic(5);
    let b = RecordStore::synthetic(5);
    assert_eq!(a.records(), b.records());
    assert_eq!(a.all_areas(), b.all_areas());
}

#[test]
fn data_source_serializes_with_kind_tag() {
    let json = serde_json::to_value(DataSource::Synthetic { seed: 42 }).expect("serialize");
    assert_eq!(json["kind"], "synthetic");
    assert_eq!(json["seed"], 42);

    let json = serde_json::to_value(DataSource::InMemory).expect("serialize");
    assert_eq!(json["kind"], "in_memory");
}
