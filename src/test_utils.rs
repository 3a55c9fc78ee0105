//! src/test_utils.rs
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let path = std::env::temp_dir()
        .join("gocount")
        .join(Uuid::new_v4().to_string());
    fs::create_dir_all(&path).expect("Failed to create test directory");
    path
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Every record of every part file in `dir`, sorted.
pub fn read_output(dir: &Path) -> Vec<String> {
    let mut records = vec![];
    for entry in fs::read_dir(dir).expect("Failed to list output directory") {
        let path = entry.expect("Failed to read entry").path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        if !name.starts_with("part-r-") {
            continue;
        }
        let contents = fs::read_to_string(&path).expect("Failed to read part file");
        records.extend(contents.lines().map(String::from));
    }
    records.sort();
    records
}
