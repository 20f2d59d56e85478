//! Storage operations
//!
//! Enumerates the served directory and opens files for transfer. Only the
//! directory's own entries are visible; names are matched exactly, never
//! resolved as paths.

use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

use crate::error::StorageError;

/// Names every directory listing starts with, as `readdir` reports them.
const DOT_ENTRIES: [&str; 2] = [".", ".."];

/// Lists the names of every real entry in `root`, in directory order.
///
/// The `.` and `..` pseudo-entries are not included; see [`directory_listing`].
pub async fn list_entries(root: &Path) -> Result<Vec<String>, StorageError> {
    let read_dir_error = |source: std::io::Error| StorageError::ReadDir {
        path: root.display().to_string(),
        source,
    };

    let mut entries = fs::read_dir(root).await.map_err(read_dir_error)?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    debug!("Listed {} entries in {}", names.len(), root.display());
    Ok(names)
}

/// Lists `root` the way a client sees it: `.` and `..` first, then every entry.
pub async fn directory_listing(root: &Path) -> Result<Vec<String>, StorageError> {
    let mut names: Vec<String> = DOT_ENTRIES.iter().map(|s| s.to_string()).collect();
    names.extend(list_entries(root).await?);
    Ok(names)
}

/// Searches `root` for an entry named exactly `name`.
pub async fn find_entry(root: &Path, name: &str) -> Result<Option<PathBuf>, StorageError> {
    let found = list_entries(root)
        .await?
        .into_iter()
        .find(|entry| entry == name)
        .map(|entry| root.join(entry));
    Ok(found)
}

/// Opens a located entry for reading.
pub async fn open_file(path: &Path) -> Result<File, StorageError> {
    File::open(path).await.map_err(|source| StorageError::Open {
        path: path.display().to_string(),
        source,
    })
}

/// Builds the listing payload: every name followed by a newline.
pub fn render_listing(entries: &[String]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(entries.iter().map(|e| e.len() + 1).sum());
    for entry in entries {
        payload.extend_from_slice(entry.as_bytes());
        payload.push(b'\n');
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tokio::io::AsyncReadExt;

    fn populated_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alpha.txt"), b"alpha").unwrap();
        std::fs::write(dir.path().join("beta.bin"), [0u8, 1, 2, 0]).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_list_entries_matches_directory() {
        let dir = populated_dir();
        let names: HashSet<String> = list_entries(dir.path()).await.unwrap().into_iter().collect();
        let expected: HashSet<String> = ["alpha.txt", "beta.bin", "nested"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_directory_listing_includes_dot_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let listing = directory_listing(dir.path()).await.unwrap();
        assert_eq!(listing, vec![".", "..", "a.txt"]);
    }

    #[tokio::test]
    async fn test_find_entry_ignores_dot_entries() {
        let dir = populated_dir();
        assert_eq!(find_entry(dir.path(), ".").await.unwrap(), None);
        assert_eq!(find_entry(dir.path(), "..").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_entries_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(matches!(
            list_entries(&missing).await,
            Err(StorageError::ReadDir { .. })
        ));
        assert!(directory_listing(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_find_entry_is_exact() {
        let dir = populated_dir();
        assert_eq!(
            find_entry(dir.path(), "alpha.txt").await.unwrap(),
            Some(dir.path().join("alpha.txt"))
        );
        assert_eq!(find_entry(dir.path(), "alpha").await.unwrap(), None);
        assert_eq!(find_entry(dir.path(), "ALPHA.TXT").await.unwrap(), None);
        assert_eq!(find_entry(dir.path(), "../alpha.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_open_file_reads_binary_content() {
        let dir = populated_dir();
        let mut file = open_file(&dir.path().join("beta.bin")).await.unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, vec![0u8, 1, 2, 0]);
    }

    #[test]
    fn test_render_listing_terminates_each_name() {
        let entries = vec!["a".to_string(), "b c".to_string()];
        assert_eq!(render_listing(&entries), b"a\nb c\n");
        assert!(render_listing(&[]).is_empty());
    }
}
