//! Tests for the change cache

use std::fs;

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use solsync_core::{ChangeCache, SyncContext};
use tempfile::TempDir;

fn synced_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 7, 1, 10, 0, 0).unwrap()
}

fn setup() -> (TempDir, ChangeCache) {
    let temp = TempDir::new().unwrap();
    let ctx = SyncContext::new("sol", temp.path());
    let cache = ChangeCache::for_adapter(&ctx, "Library");
    (temp, cache)
}

#[test]
fn store_is_named_after_adapter_type() {
    let (temp, cache) = setup();
    assert_eq!(
        cache.store_path(),
        temp.path().join(".solsync").join("cache.Library.yaml")
    );
}

#[test]
fn lookup_without_entry_is_none() {
    let (temp, cache) = setup();
    let file = temp.path().join("util.lua");
    fs::write(&file, "return 1").unwrap();

    assert_eq!(cache.lookup_sync(&file).unwrap(), None);
}

#[test]
fn lookup_returns_recorded_time_until_edited() {
    let (temp, cache) = setup();
    let file = temp.path().join("util.lua");
    fs::write(&file, "return 1").unwrap();

    let recorded = cache.record_sync(&file, Some(synced_at())).unwrap();
    assert_eq!(recorded, synced_at());
    assert_eq!(cache.lookup_sync(&file).unwrap(), Some(synced_at()));
    // repeated lookups without edits are stable
    assert_eq!(cache.lookup_sync(&file).unwrap(), Some(synced_at()));

    fs::write(&file, "return 2").unwrap();
    assert_eq!(cache.lookup_sync(&file).unwrap(), None);
}

#[test]
fn reverting_content_revalidates_entry() {
    let (temp, cache) = setup();
    let file = temp.path().join("util.lua");
    fs::write(&file, "return 1").unwrap();
    cache.record_sync(&file, Some(synced_at())).unwrap();

    fs::write(&file, "return 2").unwrap();
    fs::write(&file, "return 1").unwrap();
    assert_eq!(cache.lookup_sync(&file).unwrap(), Some(synced_at()));
}

#[test]
fn record_preserves_other_entries() {
    let (temp, cache) = setup();
    let a = temp.path().join("a.lua");
    let b = temp.path().join("b.lua");
    fs::write(&a, "a").unwrap();
    fs::write(&b, "b").unwrap();

    cache.record_sync(&a, Some(synced_at())).unwrap();
    cache.record_sync(&b, None).unwrap();

    assert_eq!(cache.entries().unwrap().len(), 2);
    assert_eq!(cache.lookup_sync(&a).unwrap(), Some(synced_at()));
    assert!(cache.lookup_sync(&b).unwrap().is_some());
}

#[test]
fn relative_and_absolute_paths_share_an_entry() {
    let (temp, cache) = setup();
    let file = temp.path().join("util.lua");
    fs::write(&file, "return 1").unwrap();
    cache.record_sync(&file, Some(synced_at())).unwrap();

    let via_dot = temp.path().join(".").join("util.lua");
    assert_eq!(cache.lookup_sync(&via_dot).unwrap(), Some(synced_at()));
}

#[test]
fn lookup_of_missing_file_is_error() {
    let (temp, cache) = setup();
    assert!(cache.lookup_sync(&temp.path().join("gone.lua")).is_err());
}

#[test]
fn corrupt_store_reads_as_empty_and_is_moved_aside_on_write() {
    let (temp, cache) = setup();
    let file = temp.path().join("util.lua");
    fs::write(&file, "return 1").unwrap();
    fs::create_dir_all(cache.store_path().parent().unwrap()).unwrap();
    fs::write(cache.store_path(), "{ this is: [not yaml").unwrap();

    assert_eq!(cache.lookup_sync(&file).unwrap(), None);

    cache.record_sync(&file, Some(synced_at())).unwrap();
    assert_eq!(cache.lookup_sync(&file).unwrap(), Some(synced_at()));

    let mut aside = cache.store_path().as_os_str().to_owned();
    aside.push(".corrupt");
    assert_eq!(
        fs::read_to_string(aside).unwrap(),
        "{ this is: [not yaml"
    );
}

#[test]
fn store_keeps_millisecond_precision() {
    let (temp, cache) = setup();
    let file = temp.path().join("util.lua");
    fs::write(&file, "return 1").unwrap();
    let at = synced_at() + chrono::Duration::milliseconds(250);

    cache.record_sync(&file, Some(at)).unwrap();

    let raw = fs::read_to_string(cache.store_path()).unwrap();
    assert!(raw.contains("2016-07-01T10:00:00.250Z"), "{raw}");
    assert_eq!(cache.lookup_sync(&file).unwrap(), Some(at));
}
