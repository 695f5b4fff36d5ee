//! Tests for RealFileSystem atomic writes

use std::fs;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use catree::infrastructure::traits::{FileSystem, RealFileSystem};

#[test]
fn given_missing_parent_when_writing_atomically_then_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("catalog.toml");

    RealFileSystem.write_atomic(&path, "next_id = 1\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "next_id = 1\n");
}

#[test]
fn given_existing_file_when_writing_atomically_then_replaced_without_leftovers() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("catalog.toml");
    fs::write(&path, "old").unwrap();

    RealFileSystem.write_atomic(&path, "new").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn given_concurrent_writers_when_writing_atomically_then_one_complete_version_wins() {
    let temp = TempDir::new().unwrap();
    let path = Arc::new(temp.path().join("catalog.toml"));
    let payloads: Vec<String> = (0..8).map(|i| format!("writer-{i}\n").repeat(2000)).collect();

    let handles: Vec<_> = payloads
        .iter()
        .cloned()
        .map(|payload| {
            let path = Arc::clone(&path);
            thread::spawn(move || RealFileSystem.write_atomic(&path, &payload))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let content = fs::read_to_string(path.as_ref()).unwrap();
    assert!(payloads.contains(&content), "file holds a mixed or partial write");
    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temp files left behind");
}
