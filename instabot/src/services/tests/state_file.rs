//! Tests for JsonStateFile against a real filesystem
//!
//! These cover first-run initialization, the persisted document shape and
//! corrupt-file handling through the relationship store.

use std::fs;

use tempfile::TempDir;

use super::common::test_today;
use crate::core::{RelationshipStatus, RelationshipStore};
use crate::error::InstabotError;
use crate::services::{FixedClock, JsonStateFile};
use crate::traits::StateStorage;

fn open_store(file: &JsonStateFile) -> Result<RelationshipStore, InstabotError> {
    RelationshipStore::open(Box::new(file.clone()), Box::new(FixedClock::new(test_today())))
}

/// Missing state file is created on open with the reserved fields
#[test]
fn test_missing_file_is_initialized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join(".instabot_db");
    let file = JsonStateFile::new(&path);

    let store = open_store(&file).unwrap();
    assert!(store.is_empty());
    assert!(path.exists(), "state file should be written on first open");

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({"users": [], "likes": [], "comments": []}));
}

/// Records serialize with exactly one date key in YYYY/MM/DD form
#[test]
fn test_persisted_record_shape() {
    let dir = TempDir::new().unwrap();
    let file = JsonStateFile::new(dir.path().join("state.json"));

    let mut store = open_store(&file).unwrap();
    store.record_follow("alice", 15).unwrap();
    store.record_follow("bob", 15).unwrap();
    store.record_unfollow("bob").unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(
        raw["users"],
        serde_json::json!([
            {"username": "alice", "date_followed": "2024/03/20"},
            {"username": "bob", "date_unfollowed": "2024/03/20"}
        ])
    );
    assert!(!file.path().with_file_name("state.json.tmp").exists(), "temp file should be renamed away");
}

/// A second open sees what the first one wrote, in the same order
#[test]
fn test_reopen_preserves_state_and_order() {
    let dir = TempDir::new().unwrap();
    let file = JsonStateFile::new(dir.path().join("state.json"));

    {
        let mut store = open_store(&file).unwrap();
        for name in ["zoe", "adam", "mia"] {
            store.record_follow(name, 15).unwrap();
        }
    }

    let store = open_store(&file).unwrap();
    let names: Vec<_> = store.accounts().map(|a| a.username.as_str()).collect();
    assert_eq!(names, vec!["zoe", "adam", "mia"]);
    assert_eq!(store.status("mia"), RelationshipStatus::Followed { since: test_today() });
}

/// Unparseable content is reported as corrupt state
#[test]
fn test_unparseable_file_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let contents: [&[u8]; 4] = [
        b"{not json",
        br#"{"likes": []}"#,
        br#"{"users": {"alice": 1}}"#,
        &[0xff, 0xfe, b'{', b'}'],
    ];
    for content in contents {
        fs::write(&path, content).unwrap();
        let file = JsonStateFile::new(&path);

        assert!(
            matches!(file.load(), Err(InstabotError::CorruptState { .. })),
            "{}",
            String::from_utf8_lossy(content)
        );
        assert!(matches!(open_store(&file), Err(InstabotError::CorruptState { .. })));
    }
}

/// Unknown reserved content survives a rewrite
#[test]
fn test_reserved_fields_survive_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"users": [], "likes": ["/p/x/"], "comments": []}"#).unwrap();
    let file = JsonStateFile::new(&path);

    let mut store = open_store(&file).unwrap();
    store.record_follow("alice", 15).unwrap();

    let document = file.load().unwrap().unwrap();
    assert_eq!(document.likes, vec![serde_json::json!("/p/x/")]);
    assert_eq!(document.users.len(), 1);
}
