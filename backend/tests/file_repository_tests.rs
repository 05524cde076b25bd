use std::sync::Arc;

use tso_schedule::db::{FileRepository, LoadOutcome, ScheduleRepository};
use tso_schedule::models::{Schedule, ScheduleMap, SchedulePosition, SelectionContext};
use tso_schedule::services::{IntervalTemplate, ScheduleStore, StaticReferenceData};

fn ctx() -> SelectionContext {
    SelectionContext {
        country_code: "AT".into(),
        tso_eic: "10X1001A1001A59C".into(),
        balance_group_eic: "10X1001A1001A13X".into(),
    }
}

fn sample_map() -> ScheduleMap {
    let mut schedule = Schedule::synthesize(&ctx());
    let mut first = SchedulePosition::new("pos_1", "POS_1", &ctx());
    first.intervals = IntervalTemplate::Peak.generate();
    let mut second = SchedulePosition::new("pos_2", "POS_2", &ctx());
    second.intervals = IntervalTemplate::Valley.generate();
    schedule.positions = vec![first, second];

    let mut map = ScheduleMap::new();
    map.insert("apg-bg1".to_string(), schedule);
    map
}

#[tokio::test]
async fn test_missing_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileRepository::new(dir.path().join("tso-schedules.json"));
    assert_eq!(repo.load().await.unwrap(), LoadOutcome::Absent);
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_garbage_file_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tso-schedules.json");
    std::fs::write(&path, "not json at all").unwrap();

    let repo = FileRepository::new(&path);
    assert!(matches!(repo.load().await.unwrap(), LoadOutcome::Malformed(_)));
}

#[tokio::test]
async fn test_short_interval_series_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tso-schedules.json");
    let mut value = serde_json::to_value(sample_map()).unwrap();
    value["apg-bg1"]["positions"][0]["intervals"] = serde_json::json!([1.0, 2.0]);
    std::fs::write(&path, value.to_string()).unwrap();

    let repo = FileRepository::new(&path);
    assert!(matches!(repo.load().await.unwrap(), LoadOutcome::Malformed(_)));
}

#[tokio::test]
async fn test_round_trip_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tso-schedules.json");
    let map = sample_map();

    let repo = FileRepository::new(&path);
    repo.load().await.unwrap();
    repo.save(&map).await.unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    let reopened = FileRepository::new(&path);
    let loaded = reopened.load().await.unwrap().into_schedules();
    assert_eq!(loaded, map);
    assert_eq!(loaded["apg-bg1"].positions.len(), 2);

    reopened.save(&loaded).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
}

#[tokio::test]
async fn test_concurrent_writer_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tso-schedules.json");

    let first = FileRepository::new(&path);
    let second = FileRepository::new(&path);
    first.load().await.unwrap();
    second.load().await.unwrap();

    let map = sample_map();
    first.save(&map).await.unwrap();
    let err = second.save(&ScheduleMap::new()).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(err.is_retryable());

    // After reloading, the second writer sees the first one's data and may write.
    assert_eq!(second.load().await.unwrap().into_schedules(), map);
    second.save(&ScheduleMap::new()).await.unwrap();
}

#[tokio::test]
async fn test_erase_is_unconditional() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tso-schedules.json");

    let first = FileRepository::new(&path);
    let second = FileRepository::new(&path);
    first.load().await.unwrap();
    second.load().await.unwrap();
    first.save(&sample_map()).await.unwrap();

    second.erase().await.unwrap();
    assert!(!path.exists());
    // Erasing twice is fine.
    second.erase().await.unwrap();
}

#[tokio::test]
async fn test_store_keeps_memory_state_on_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tso-schedules.json");

    let mut tab_a =
        ScheduleStore::hydrate(Arc::new(FileRepository::new(&path)), &StaticReferenceData).await;
    let mut tab_b =
        ScheduleStore::hydrate(Arc::new(FileRepository::new(&path)), &StaticReferenceData).await;

    tab_a.add_position("apg-bg1").await;
    assert!(tab_a.last_persist_error().is_none());

    tab_b.add_position("tennet-bg1").await;
    assert!(tab_b.last_persist_error().is_some_and(|e| e.is_conflict()));
    assert_eq!(tab_b.get("tennet-bg1").positions.len(), 1);

    // The file still holds tab A's write.
    let on_disk = FileRepository::new(&path).load().await.unwrap().into_schedules();
    assert_eq!(on_disk.keys().collect::<Vec<_>>(), ["apg-bg1"]);

    tab_b.reload().await;
    assert_eq!(tab_b.balance_group_ids(), ["apg-bg1"]);
    tab_b.add_position("tennet-bg1").await;
    assert!(tab_b.last_persist_error().is_none());
}
