use camino::Utf8PathBuf;

use launch_registry::domain::{
    FlightNumber, Launch, LaunchFilter, LaunchUpdate, parse_launch_date,
};
use launch_registry::store::LaunchStore;

fn launch(flight_number: u32, mission: &str) -> Launch {
    Launch {
        flight_number: FlightNumber::new(flight_number),
        mission: mission.to_string(),
        rocket: "Falcon 9".to_string(),
        launch_date: parse_launch_date("2030-12-27").unwrap(),
        target: None,
        customers: vec!["NASA".to_string()],
        upcoming: true,
        success: true,
    }
}

async fn open_store(temp: &tempfile::TempDir) -> LaunchStore {
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    LaunchStore::open(root).await.unwrap()
}

#[tokio::test]
async fn upsert_and_find_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let store = open_store(&temp).await;

    store.upsert(launch(100, "Kepler Exploration X")).await.unwrap();

    let found = store
        .find_one(&LaunchFilter::by_flight_number(FlightNumber::new(100)))
        .await
        .unwrap();
    assert_eq!(found.mission, "Kepler Exploration X");

    let missing = store
        .find_one(&LaunchFilter::by_flight_number(FlightNumber::new(999)))
        .await;
    assert!(missing.is_none());
}

#[tokio::test]
async fn records_survive_reopen() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();

    {
        let store = LaunchStore::open(root.clone()).await.unwrap();
        store.upsert(launch(100, "Kepler Exploration X")).await.unwrap();
        store.upsert(launch(101, "Kepler Exploration XI")).await.unwrap();
    }

    let reopened = LaunchStore::open(root).await.unwrap();
    assert_eq!(
        reopened.max_flight_number().await,
        Some(FlightNumber::new(101))
    );
    let all = reopened.list_all().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].mission, "Kepler Exploration X");
}

#[tokio::test]
async fn upsert_fully_replaces_existing_record() {
    let temp = tempfile::tempdir().unwrap();
    let store = open_store(&temp).await;

    let mut first = launch(100, "Kepler Exploration X");
    first.target = Some("Kepler-442 b".to_string());
    store.upsert(first).await.unwrap();

    // Re-import shape: same key, different fields, no target.
    let mut replacement = launch(100, "Falcon Demo");
    replacement.customers = vec!["ZTM".to_string()];
    replacement.upcoming = false;
    store.upsert(replacement.clone()).await.unwrap();

    let stored = store
        .find_one(&LaunchFilter::by_flight_number(FlightNumber::new(100)))
        .await
        .unwrap();
    assert_eq!(stored, replacement);
    assert_eq!(stored.target, None);
    assert_eq!(store.list_all().await.len(), 1);
}

#[tokio::test]
async fn list_is_sorted_by_flight_number() {
    let temp = tempfile::tempdir().unwrap();
    let store = open_store(&temp).await;

    store.upsert(launch(103, "C")).await.unwrap();
    store.upsert(launch(100, "A")).await.unwrap();
    store.upsert(launch(101, "B")).await.unwrap();

    let numbers: Vec<u32> = store
        .list_all()
        .await
        .iter()
        .map(|l| l.flight_number.as_u32())
        .collect();
    assert_eq!(numbers, vec![100, 101, 103]);
}

#[tokio::test]
async fn update_applies_partial_fields_only() {
    let temp = tempfile::tempdir().unwrap();
    let store = open_store(&temp).await;
    store.upsert(launch(100, "Kepler Exploration X")).await.unwrap();

    let matched = store
        .update(
            FlightNumber::new(100),
            LaunchUpdate {
                upcoming: Some(false),
                success: Some(false),
            },
        )
        .await
        .unwrap();
    assert!(matched);

    let stored = store
        .find_one(&LaunchFilter::by_flight_number(FlightNumber::new(100)))
        .await
        .unwrap();
    assert!(!stored.upcoming);
    assert!(!stored.success);
    assert_eq!(stored.mission, "Kepler Exploration X");
    assert_eq!(stored.customers, vec!["NASA"]);
}

#[tokio::test]
async fn update_reports_no_match() {
    let temp = tempfile::tempdir().unwrap();
    let store = open_store(&temp).await;

    let matched = store
        .update(
            FlightNumber::new(100),
            LaunchUpdate {
                upcoming: Some(false),
                success: Some(false),
            },
        )
        .await
        .unwrap();
    assert!(!matched);
}

#[tokio::test]
async fn find_one_matches_natural_fields() {
    let temp = tempfile::tempdir().unwrap();
    let store = open_store(&temp).await;

    let mut seed = launch(1, "FalconSat");
    seed.rocket = "Falcon 1".to_string();
    store.upsert(seed).await.unwrap();
    store.upsert(launch(100, "Kepler Exploration X")).await.unwrap();

    let filter = LaunchFilter {
        mission: Some("FalconSat".to_string()),
        rocket: Some("Falcon 1".to_string()),
        ..LaunchFilter::default()
    };
    let found = store.find_one(&filter).await.unwrap();
    assert_eq!(found.flight_number.as_u32(), 1);
}
