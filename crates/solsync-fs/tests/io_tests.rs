use solsync_fs::io;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.lua");

    io::write_atomic(&path, b"return {}").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "return {}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("test.lua");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_read_text_nonexistent_file() {
    let result = io::read_text(std::path::Path::new("/nonexistent/file.lua"));
    let err = result.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("/nonexistent/file.lua"));
}

#[test]
fn test_modified_reports_mtime() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("m.lua");
    fs::write(&path, "x").unwrap();

    let mtime = io::modified(&path).unwrap();
    let expected = fs::metadata(&path).unwrap().modified().unwrap();
    assert_eq!(mtime, expected);
}

#[test]
fn test_modified_missing_file_errors() {
    assert!(io::modified(std::path::Path::new("/nonexistent/m.lua")).is_err());
}
