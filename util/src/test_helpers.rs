use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a unique temporary directory and returns it together with a path
/// for a local store snapshot inside it. The directory is removed when the
/// returned `TempDir` is dropped.
///
/// Keep the returned `TempDir` in scope for as long as you need the files.
pub fn setup_test_store_path() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let path = tmp.path().join("local_store.json");
    (tmp, path)
}
