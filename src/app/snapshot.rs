//! JSON snapshots of intermediate results
//!
//! The generator can persist the collected manifests, the deduplicated
//! manifests and the resolved titles. Snapshots allow re-rendering the
//! index without talking to the network again.
//!
//! All writes go through [`write_atomic`]: content lands in a sibling
//! temporary file which is synced and then renamed over the destination.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::constants::files;
use crate::errors::{OutputError, OutputResult};

/// Temporary sibling used while writing `destination`
pub fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    destination.with_file_name(name)
}

/// Write `contents` to `destination` so readers never see a partial file
pub async fn write_atomic(destination: &Path, contents: &[u8]) -> OutputResult<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = temp_path_for(destination);
    if let Err(e) = write_and_sync(&temp_path, contents).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(source) = tokio::fs::rename(&temp_path, destination).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(OutputError::AtomicOperationFailed {
            temp_path,
            final_path: destination.to_path_buf(),
            source,
        });
    }
    Ok(())
}

async fn write_and_sync(path: &Path, contents: &[u8]) -> OutputResult<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

/// Save `value` as pretty-printed JSON
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let json = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &json).await?;
    tracing::debug!("Saved snapshot {}", path.display());
    Ok(())
}

/// Load a JSON snapshot
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> OutputResult<T> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("/out/filterlists_jsonp.js")),
            PathBuf::from("/out/filterlists_jsonp.js.tmp")
        );
        assert_eq!(temp_path_for(Path::new("titles")), PathBuf::from("titles.tmp"));
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("file.js");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert!(!temp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn test_write_atomic_into_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("child"), b"x").unwrap();

        let err = write_atomic(&target, b"data").await.unwrap_err();
        match &err {
            OutputError::AtomicOperationFailed { final_path, .. } => assert_eq!(final_path, &target),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(std::error::Error::source(&err).is_some());
        assert!(!temp_path_for(&target).exists());
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_json_snapshot_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("titles.json");

        let mut titles = BTreeMap::new();
        titles.insert("https://a.example/".to_string(), "A".to_string());
        save_json(&path, &titles).await.unwrap();

        let loaded: BTreeMap<String, String> = load_json(&path).await.unwrap();
        assert_eq!(loaded, titles);
    }

    #[tokio::test]
    async fn test_load_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        let result: OutputResult<Vec<String>> = load_json(&dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(OutputError::Io(_))));
    }
}
