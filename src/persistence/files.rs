use super::snapshot::Snapshot;
use crate::stats::LocalStats;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Get the store directory - checks for a local .cadence first, then falls
/// back to the global ~/.cadence
pub fn get_store_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_store(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".cadence"))
}

/// Find a local .cadence directory by walking up the directory tree
fn find_local_store(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let store_dir = current.join(".cadence");
        if store_dir.exists() && store_dir.is_dir() {
            return Some(store_dir);
        }
        current = current.parent()?;
    }
}

/// Ensure the store directory exists
pub fn ensure_store_dir() -> Result<PathBuf> {
    let dir = get_store_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Get path to the timer/task snapshot file
pub fn snapshot_file() -> Result<PathBuf> {
    Ok(ensure_store_dir()?.join("snapshot.json"))
}

/// Get path to the stats counters file
pub fn stats_file() -> Result<PathBuf> {
    Ok(ensure_store_dir()?.join("stats.json"))
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    let mut temp_file =
        NamedTempFile::new_in(dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Load a snapshot, returning defaults when no file exists yet
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Snapshot::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&content).context("Failed to parse snapshot file")?;
    Ok(snapshot)
}

/// Save a snapshot as pretty-printed JSON
pub fn save_snapshot<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    atomic_write(path, &json)?;
    Ok(())
}

/// Load stats counters, returning fresh zeroed counters when no file exists
pub fn load_stats<P: AsRef<Path>>(path: P) -> Result<LocalStats> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(LocalStats::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stats: {}", path.display()))?;
    let stats: LocalStats = serde_json::from_str(&content).context("Failed to parse stats file")?;
    Ok(stats)
}

/// Save stats counters as pretty-printed JSON
pub fn save_stats<P: AsRef<Path>>(path: P, stats: &LocalStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    atomic_write(path, &json)?;
    Ok(())
}
