use std::io::Cursor;

use reliefmap::locations::{
    LocationFilters, LocationRepository, PlaceImportError, PlaceImporter, SourceType,
    VerificationStatus,
};
use reliefmap::store::SqliteStore;

const DATASET: &str = "\
name,address,latitude,longitude,source_name,source_id,is_official
Shinjuku Gyoen WC,Shinjuku,35.685,139.710,tokyo_open_data,tk-001,true
Yoyogi Park WC,Shibuya,35.671,139.694,tokyo_open_data,tk-002,yes
";

#[test]
fn official_dataset_imports_then_refreshes() {
    let store = SqliteStore::open_in_memory().expect("store opens");

    let summary = PlaceImporter::from_reader(&store, Cursor::new(DATASET)).expect("import");
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.refreshed, 0);

    let listed = store.find_all(&LocationFilters::default()).expect("listing");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|location| location.source_type == SourceType::Api
        && location.verification_status == VerificationStatus::Yellow
        && location.auto_verified));

    let summary = PlaceImporter::from_reader(&store, Cursor::new(DATASET)).expect("re-import");
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.refreshed, 2);
    assert_eq!(store.row_count("locations_base").expect("count"), 2);
    assert_eq!(store.row_count("locations_merged").expect("count"), 2);
}

#[test]
fn a_bad_row_aborts_before_any_write() {
    let store = SqliteStore::open_in_memory().expect("store opens");
    let dataset = format!("{DATASET}Broken WC,,95.0,139.0,tokyo_open_data,tk-003,true\n");

    match PlaceImporter::from_reader(&store, Cursor::new(dataset)) {
        Err(PlaceImportError::InvalidRow { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected invalid row, got {other:?}"),
    }
    assert_eq!(store.row_count("locations_merged").expect("count"), 0);
}

#[test]
fn missing_file_is_an_io_error() {
    let store = SqliteStore::open_in_memory().expect("store opens");
    assert!(matches!(
        PlaceImporter::from_path(&store, "/definitely/not/here.csv"),
        Err(PlaceImportError::Io(_))
    ));
}
