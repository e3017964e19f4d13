//! Subscriber file store tests
//!
//! Each test works against its own temporary directory.

use execfit_api::infrastructure::subscribers::{FileSubscriberStore, NewSubscriber};
use execfit_api::infrastructure::traits::SubscriberStore;
use std::time::Duration;
use tempfile::TempDir;

fn new_subscriber(email: &str, cookbook_id: Option<&str>) -> NewSubscriber {
    NewSubscriber {
        email: email.to_owned(),
        cookbook_id: cookbook_id.map(str::to_owned),
        cookbook_title: cookbook_id.map(|id| format!("{id} title")),
        source: None,
    }
}

#[tokio::test]
async fn test_missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileSubscriberStore::new(dir.path().join("subscribers.json"));

    assert!(store.list_active().await.unwrap().is_empty());
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 0);
    assert!(stats.by_cookbook.is_empty());
}

#[tokio::test]
async fn test_save_creates_file_and_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("subscribers.json");
    let store = FileSubscriberStore::new(&path);

    let saved = store
        .save(new_subscriber("lead@example.com", Some("vegan-exec")))
        .await
        .unwrap();

    assert!(path.exists());
    assert!(saved.is_active);
    assert_eq!(saved.source.as_deref(), Some("cookbook-download"));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("lead@example.com"));
}

#[tokio::test]
async fn test_save_same_email_keeps_id() {
    let dir = TempDir::new().unwrap();
    let store = FileSubscriberStore::new(dir.path().join("subscribers.json"));

    let first = store
        .save(new_subscriber("lead@example.com", Some("vegan-exec")))
        .await
        .unwrap();
    let second = store
        .save(new_subscriber("lead@example.com", Some("lo-carb-hi-results")))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);

    let subscribers = store.list_active().await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(
        subscribers[0].cookbook_id.as_deref(),
        Some("lo-carb-hi-results")
    );
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = FileSubscriberStore::new(dir.path().join("subscribers.json"));

    store
        .save(new_subscriber("first@example.com", Some("vegan-exec")))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    store
        .save(new_subscriber("second@example.com", Some("vegan-exec")))
        .await
        .unwrap();

    let emails: Vec<String> = store
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.email)
        .collect();

    assert_eq!(emails, vec!["second@example.com", "first@example.com"]);
}

#[tokio::test]
async fn test_stats_group_by_cookbook() {
    let dir = TempDir::new().unwrap();
    let store = FileSubscriberStore::new(dir.path().join("subscribers.json"));

    store
        .save(new_subscriber("a@example.com", Some("vegan-exec")))
        .await
        .unwrap();
    store
        .save(new_subscriber("b@example.com", Some("vegan-exec")))
        .await
        .unwrap();
    store
        .save(new_subscriber("c@example.com", None))
        .await
        .unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_cookbook.get("vegan-exec"), Some(&2));
    assert_eq!(stats.by_cookbook.get("unknown"), Some(&1));
}

#[tokio::test]
async fn test_corrupt_file_is_moved_aside_on_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subscribers.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = FileSubscriberStore::new(&path);
    assert!(store.list_active().await.unwrap().is_empty());
    // reading alone leaves the file untouched
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");

    store
        .save(new_subscriber("lead@example.com", Some("vegan-exec")))
        .await
        .unwrap();
    assert_eq!(store.list_active().await.unwrap().len(), 1);

    let quarantined: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("subscribers.json.corrupt-"))
        .collect();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join(&quarantined[0])).unwrap(),
        "{ not json"
    );
}

#[tokio::test]
async fn test_loads_file_with_timestamp_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subscribers.json");
    std::fs::write(
        &path,
        r#"[
  {
    "id": "1717171717171",
    "email": "early@example.com",
    "cookbook_id": "executive-physique",
    "cookbook_title": "Executive Physique",
    "subscribed_at": "2024-05-31T16:08:37.171Z",
    "source": "cookbook-download",
    "is_active": true
  },
  {
    "id": "1717171800000",
    "email": "noid@example.com",
    "subscribed_at": "2024-05-31T16:10:00.000Z",
    "is_active": true
  }
]"#,
    )
    .unwrap();

    let store = FileSubscriberStore::new(&path);
    let subscribers = store.list_active().await.unwrap();
    assert_eq!(subscribers.len(), 2);
    assert_eq!(subscribers[1].id, "1717171717171");
    assert_eq!(subscribers[0].cookbook_id, None);

    store
        .save(new_subscriber("new@example.com", Some("vegan-exec")))
        .await
        .unwrap();
    let updated = store
        .save(new_subscriber("early@example.com", Some("vegan-exec")))
        .await
        .unwrap();
    assert_eq!(updated.id, "1717171717171");

    let emails: Vec<String> = store
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.email)
        .collect();
    assert_eq!(emails.len(), 3);
    assert!(emails.contains(&"noid@example.com".to_owned()));

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.by_cookbook.get("vegan-exec"), Some(&2));
    assert_eq!(stats.by_cookbook.get("unknown"), Some(&1));
}
