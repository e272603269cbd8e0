//! Record store tests

use super::*;
use crate::error::AppError;
use chrono::NaiveDate;
use tempfile::TempDir;

/// Helper to create a test store
async fn create_test_store() -> (RecordStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::open(&temp_dir.path().join("data")).await.unwrap();
    (store, temp_dir)
}

fn listen_entry(username: &str, track: &str) -> ListenEntry {
    ListenEntry {
        id: EntityId::new().0,
        username: username.to_string(),
        artist: "Artist".to_string(),
        track: track.to_string(),
        image: None,
        added_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
    }
}

#[tokio::test]
async fn test_open_initializes_every_dataset() {
    let (store, _temp_dir) = create_test_store().await;

    for dataset in Dataset::ALL {
        assert!(store.data_dir().join(dataset.file_name()).exists());
    }
    assert!(store.load::<User>().await.unwrap().is_empty());
    assert!(store.load::<Review>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_file_is_recreated_lazily() {
    let (store, _temp_dir) = create_test_store().await;
    let path = store.data_dir().join(Dataset::Follows.file_name());
    std::fs::remove_file(&path).unwrap();

    let rows = store.load::<FollowEdge>().await.unwrap();
    assert!(rows.is_empty());
    assert!(path.exists());
}

#[tokio::test]
async fn test_save_overwrites_and_preserves_order() {
    let (store, _temp_dir) = create_test_store().await;

    let entries = vec![
        listen_entry("ada", "one"),
        listen_entry("bob", "two"),
        listen_entry("ada", "three"),
    ];
    store.save(entries.clone()).await.unwrap();

    let loaded = store.load::<ListenEntry>().await.unwrap();
    let tracks: Vec<_> = loaded.iter().map(|e| e.track.as_str()).collect();
    assert_eq!(tracks, vec!["one", "two", "three"]);

    store.save(vec![entries[1].clone()]).await.unwrap();
    let loaded = store.load::<ListenEntry>().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].track, "two");
}

#[tokio::test]
async fn test_save_bumps_version() {
    let (store, _temp_dir) = create_test_store().await;

    assert_eq!(store.snapshot::<User>().await.unwrap().version, 0);
    store.save::<User>(vec![]).await.unwrap();
    store.save::<User>(vec![]).await.unwrap();
    assert_eq!(store.snapshot::<User>().await.unwrap().version, 2);
}

#[tokio::test]
async fn test_update_applies_mutation() {
    let (store, _temp_dir) = create_test_store().await;

    let count = store
        .update(|rows: &mut Vec<FollowEdge>| {
            rows.push(FollowEdge {
                follower: "ada".to_string(),
                following: "bob".to_string(),
            });
            Ok(rows.len())
        })
        .await
        .unwrap();

    assert_eq!(count, 1);
    let snapshot = store.snapshot::<FollowEdge>().await.unwrap();
    assert_eq!(snapshot.version, 1);
    assert!(snapshot.rows[0].matches("ada", "bob"));
}

#[tokio::test]
async fn test_failed_mutation_writes_nothing() {
    let (store, _temp_dir) = create_test_store().await;

    let result = store
        .update(|rows: &mut Vec<FollowEdge>| -> Result<(), AppError> {
            rows.push(FollowEdge {
                follower: "ada".to_string(),
                following: "bob".to_string(),
            });
            Err(AppError::NotFound)
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
    let snapshot = store.snapshot::<FollowEdge>().await.unwrap();
    assert_eq!(snapshot.version, 0);
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn test_update_rejects_concurrent_external_write() {
    let (store, _temp_dir) = create_test_store().await;
    let path = store.data_dir().join(Dataset::Follows.file_name());

    let result = store
        .update(|rows: &mut Vec<FollowEdge>| {
            // Another process rewrites the file while we hold the rows.
            std::fs::write(&path, r#"{"version": 7, "rows": []}"#).unwrap();
            rows.push(FollowEdge {
                follower: "ada".to_string(),
                following: "bob".to_string(),
            });
            Ok(())
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    let snapshot = store.snapshot::<FollowEdge>().await.unwrap();
    assert_eq!(snapshot.version, 7);
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn test_nullable_columns_round_trip() {
    let (store, _temp_dir) = create_test_store().await;

    let triple = FavoriteTriple {
        username: "ada".to_string(),
        artists: [
            Some(FavoriteArtist {
                name: "Air".to_string(),
                image: None,
            }),
            None,
            None,
        ],
    };
    store.save(vec![triple.clone()]).await.unwrap();

    let loaded = store.load::<FavoriteTriple>().await.unwrap();
    assert_eq!(loaded, vec![triple]);
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let (store, _temp_dir) = create_test_store().await;
    let path = store.data_dir().join(Dataset::Users.file_name());
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(
        store.load::<User>().await,
        Err(AppError::Serialization(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_recreating_missing_file_never_drops_an_update() {
    let (store, _temp_dir) = create_test_store().await;
    let path = store.data_dir().join(Dataset::ListenList.file_name());

    for round in 0..20 {
        std::fs::remove_file(&path).unwrap();

        let (loaded, updated) = tokio::join!(
            store.load::<ListenEntry>(),
            store.update(|rows: &mut Vec<ListenEntry>| {
                rows.push(listen_entry("ada", &format!("track-{round}")));
                Ok(())
            })
        );
        loaded.unwrap();
        updated.unwrap();

        let rows = store.load::<ListenEntry>().await.unwrap();
        assert_eq!(rows.len(), 1, "round {round}");
        assert_eq!(rows[0].track, format!("track-{round}"));
    }
}
