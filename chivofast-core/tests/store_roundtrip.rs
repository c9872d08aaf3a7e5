//! Integration test: CSV ingestion through the SQLite store and back.

use chivofast_core::ingest::{parse_csv, to_csv};
use chivofast_core::records::filter_usable;
use chivofast_core::store::DeliveryStore;
use pretty_assertions::assert_eq;

const SAMPLE_CSV: &str = "zone,order_type,weather,traffic,delivery_time\n\
    San Salvador,express,sunny,low,30\n\
    Santa Ana,standard,rainy,high,55\n\
    San Miguel,express,cloudy,medium,42.5\n\
    La Libertad,standard,sunny,low,\n";

#[test]
fn ingest_store_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("deliveries.db");

    let rows = parse_csv(SAMPLE_CSV).unwrap();
    assert_eq!(rows.len(), 4);
    let usable = filter_usable(rows);
    // The La Libertad row has no delivery_time and is dropped.
    assert_eq!(usable.len(), 3);

    let mut store = DeliveryStore::open(&db_path).unwrap();
    assert_eq!(store.append(&usable).unwrap(), 3);
    assert_eq!(store.count().unwrap(), 3);

    let fetched = store.fetch_all(None).unwrap();
    assert_eq!(fetched, usable);

    let exported = to_csv(&fetched);
    let reparsed = filter_usable(parse_csv(&exported).unwrap());
    assert_eq!(reparsed, usable);

    assert_eq!(store.purge().unwrap(), 3);
    assert_eq!(store.fetch_all(None).unwrap().len(), 0);
}

#[test]
fn reopen_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("deliveries.db");

    let usable = filter_usable(parse_csv(SAMPLE_CSV).unwrap());
    {
        let mut store = DeliveryStore::open(&db_path).unwrap();
        store.append(&usable).unwrap();
    }
    let store = DeliveryStore::open(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 3);
}
