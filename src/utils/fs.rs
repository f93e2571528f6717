//! Async file reading and atomic writing.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Read a UTF-8 file, naming `what` it is in the error.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub async fn read_text(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {what}: {}", path.display()))
}

/// Write `content` to `path` by writing a sibling `.tmp` file and renaming it.
///
/// Readers never observe a partially written file. Missing parent directories
/// are created.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written, synced
/// or renamed into place.
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&temp_path)
            .await
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content)
            .await
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;
        file.sync_all().await.context("Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_atomic_write_creates_parents_and_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("page.html");

        atomic_write(&path, b"first").await.unwrap();
        atomic_write(&path, b"second").await.unwrap();

        assert_eq!(read_text(&path, "output").await.unwrap(), "second");
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_read_text_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.json");

        let err = read_text(&path, "context file").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read context file"));
        assert!(err.to_string().contains("missing.json"));
    }
}
