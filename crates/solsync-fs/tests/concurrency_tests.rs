//! Concurrent access tests for LockGuard and write_atomic
//!
//! Verifies that read-modify-write cycles serialized by the fs2 lock never
//! lose updates, and that atomic writes never leave torn content.

use solsync_fs::io::{self, LockGuard};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

#[test]
fn test_locked_read_modify_write_loses_no_updates() {
    let dir = tempdir().unwrap();
    let file_path = Arc::new(dir.path().join("counter.txt"));
    io::write_text(&file_path, "0").unwrap();

    let num_threads = 8;
    let increments = 25;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let path = Arc::clone(&file_path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..increments {
                    let _guard = LockGuard::acquire(&path).unwrap();
                    let current: u32 = io::read_text(&path).unwrap().trim().parse().unwrap();
                    io::write_text(&path, &(current + 1).to_string()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let total: u32 = io::read_text(&file_path).unwrap().parse().unwrap();
    assert_eq!(total, (num_threads * increments) as u32);
}

#[test]
fn test_concurrent_atomic_writes_never_interleave() {
    let dir = tempdir().unwrap();
    let file_path = Arc::new(dir.path().join("concurrent.txt"));

    let num_threads = 10;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let path = Arc::clone(&file_path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..20 {
                    let content = format!("thread{}:write{}\n", thread_id, i);
                    io::write_text(&path, &content).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let content = std::fs::read_to_string(file_path.as_ref()).unwrap();
    assert!(content.starts_with("thread"));
    assert_eq!(content.matches("thread").count(), 1);
}
