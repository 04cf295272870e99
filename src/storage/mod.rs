use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};

use anyhow::Result;
use tracing::{info, warn};

pub mod file;

/// Total size of the regular files directly under `path`, in KB (floored).
pub fn directory_size_kb(path: &Path) -> Result<u64> {
    let mut total = 0u64;

    for entry in fs::read_dir(path)? {
        let meta = entry?.metadata()?;
        if meta.is_file() {
            total += meta.len();
        }
    }

    Ok(total / 1024)
}

/// Removes every regular file directly under `path`.
pub fn cleanup(path: &Path) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}

pub fn evict_older_than(path: &Path, max_age: Duration) -> Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }

        // clock skew yields Err, treat as fresh
        let age = now.duration_since(meta.modified()?).unwrap_or_default();
        if age > max_age {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}

/// Wipes `path` once it grows past `limit_kb`, otherwise drops files older
/// than `max_age`.
pub fn housekeep(path: &Path, limit_kb: u64, max_age: Duration) -> Result<()> {
    let size = directory_size_kb(path)?;

    if size > limit_kb {
        let removed = cleanup(path)?;
        info!(
            "{} is {}KB (limit {}KB), removed {} files",
            path.display(),
            size,
            limit_kb,
            removed
        );
        return Ok(());
    }

    let removed = evict_older_than(path, max_age)?;
    if removed > 0 {
        info!("{}: evicted {} expired files", path.display(), removed);
    }

    Ok(())
}

/// Housekeeping never fails a request.
pub fn housekeep_logged(path: &Path, limit_kb: u64, max_age: Duration) {
    if let Err(e) = housekeep(path, limit_kb, max_age) {
        warn!("housekeeping {} failed: {:?}", path.display(), e);
    }
}
