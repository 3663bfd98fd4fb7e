use crate::Result;
use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Read a file to a `String`, returning `None` if there is no file at `path`.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file at {}", path.display())),
    }
}

/// Basically move a file. Renames `from` -> `to`.
pub(crate) async fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    tokio::fs::rename(from.as_ref(), to.as_ref())
        .await
        .with_context(|| {
            format!(
                "Unable to move file from '{}' to '{}'",
                from.as_ref().to_string_lossy(),
                to.as_ref().to_string_lossy()
            )
        })
}

/// Remove a file, ignoring the case where it is already gone.
pub(crate) async fn remove(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match tokio::fs::remove_file(path).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Unable to remove {}", path.display())),
    }
}

/// Create a directory and all of its parents.
pub(crate) async fn make_dir(p: impl AsRef<Path>) -> Result<()> {
    let p = p.as_ref();
    tokio::fs::create_dir_all(p)
        .await
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
}

pub(crate) async fn canonicalize(p: impl AsRef<Path>) -> Result<PathBuf> {
    let p = p.as_ref();
    tokio::fs::canonicalize(p)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", p.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_optional_missing_file() {
        let dir = TempDir::new().unwrap();
        let found = read_optional(&dir.path().join("nope.json")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.json");
        write(&path, "[]").await.unwrap();
        assert_eq!(read_optional(&path).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(read(&path).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        remove(dir.path().join("gone")).await.unwrap();
    }
}
