use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;
use uuid::Uuid;

fn temp_name() -> String {
    format!(".{}.part", Uuid::new_v4())
}

/// Writes `data` to `dir/name` through a temporary sibling and a rename, so
/// readers see either the previous file or the complete new one.
pub async fn write_atomic(dir: &Path, name: &str, data: &[u8]) -> Result<PathBuf> {
    let tmp = dir.join(temp_name());
    let dst = dir.join(name);

    tokio::fs::write(&tmp, data)
        .await
        .with_context(|| format!("write {}", tmp.display()))?;

    if let Err(e) = tokio::fs::rename(&tmp, &dst).await {
        tokio::fs::remove_file(&tmp).await.unwrap_or_else(|e| {
            warn!("remove temp file error: {:?}", e);
        });
        return Err(e).with_context(|| format!("rename into {}", dst.display()));
    }

    Ok(dst)
}

/// File size in KB (floored).
pub async fn size_kb(path: &Path) -> Result<u64> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("stat {}", path.display()))?;
    Ok(meta.len() / 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();

        write_atomic(dir.path(), "photo.png", b"first").await.unwrap();
        let path = write_atomic(dir.path(), "photo.png", b"second")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("photo.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        // no temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn write_atomic_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        assert!(write_atomic(&missing, "a.png", b"x").await.is_err());
    }

    #[tokio::test]
    async fn size_kb_floors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, vec![0u8; 2047]).unwrap();

        assert_eq!(size_kb(&path).await.unwrap(), 1);
    }
}
