use super::*;

// =============================================================
// MemoryStore
// =============================================================

#[test]
fn memory_store_missing_key_is_none() {
    let store = MemoryStore::new();
    assert_eq!(store.get(TOKEN_KEY), None);
    assert!(store.is_empty());
}

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    store.set(TOKEN_KEY, "tok").unwrap();
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok"));
    assert_eq!(store.len(), 1);

    store.remove(TOKEN_KEY).unwrap();
    assert_eq!(store.get(TOKEN_KEY), None);
}

#[test]
fn memory_store_remove_missing_key_is_ok() {
    let store = MemoryStore::new();
    assert!(store.remove(USER_KEY).is_ok());
}

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::new();
    let other = store.clone();
    store.set(LANGUAGE_KEY, "en").unwrap();
    assert_eq!(other.get(LANGUAGE_KEY).as_deref(), Some("en"));
}

#[test]
fn memory_store_quota_rejects_oversized_write() {
    let store = MemoryStore::with_quota(10);
    store.set("token", "abc").unwrap();
    let err = store.set("user", "0123456789").unwrap_err();
    assert_eq!(err, StorageError::QuotaExceeded { key: "user".to_owned() });
    assert_eq!(store.get("user"), None);
    assert_eq!(store.get("token").as_deref(), Some("abc"));
}

#[test]
fn memory_store_quota_counts_replaced_value_once() {
    let store = MemoryStore::with_quota(10);
    store.set("token", "abcde").unwrap();
    // Replacing the value must not count the old value against the quota.
    store.set("token", "vwxyz").unwrap();
    assert_eq!(store.get("token").as_deref(), Some("vwxyz"));
}

// =============================================================
// JsonFileStore
// =============================================================

#[test]
fn json_file_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("session.json")).unwrap();
    assert_eq!(store.get(TOKEN_KEY), None);
}

#[test]
fn json_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    {
        let store = JsonFileStore::open(&path).unwrap();
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(LANGUAGE_KEY, "en").unwrap();
        store.remove(LANGUAGE_KEY).unwrap();
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("tok"));
    assert_eq!(reopened.get(LANGUAGE_KEY), None);
    assert_eq!(reopened.path(), path.as_path());
}

#[test]
fn json_file_store_malformed_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get(TOKEN_KEY), None);

    store.set(TOKEN_KEY, "fresh").unwrap();
    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("fresh"));
}

#[test]
fn json_file_store_failed_write_keeps_memory_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directory does not exist, so every write fails.
    let path = dir.path().join("missing").join("session.json");
    let store = JsonFileStore::open(&path).unwrap();

    let err = store.set(TOKEN_KEY, "tok").unwrap_err();
    assert!(matches!(err, StorageError::Write(_)));
    assert_eq!(store.get(TOKEN_KEY), None);
}

#[test]
fn json_file_store_replaces_file_through_staging_copy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let staging = dir.path().join("session.json.tmp");
    // Leftover from an interrupted write.
    std::fs::write(&staging, "{\"tok").unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    store.set(TOKEN_KEY, "tok").unwrap();

    assert!(!staging.exists());
    let on_disk: BTreeMap<String, String> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.get(TOKEN_KEY).map(String::as_str), Some("tok"));
}

#[test]
fn json_file_store_interrupted_write_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    JsonFileStore::open(&path).unwrap().set(TOKEN_KEY, "tok").unwrap();
    // A crash between staging and rename leaves only the staging file behind.
    std::fs::write(dir.path().join("session.json.tmp"), "{\"tok").unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("tok"));
}
