//! Init command implementation.

use crate::config::{self, CONFIG_FILENAME, CliOverrides, ResolvedConfig, TRACKER_DIR_NAME};
use crate::error::{Result, TrackerError};
use crate::storage::SqliteStorage;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if a database exists and `force` is not set,
/// or an error if the directory or database cannot be created.
pub fn execute(force: bool, root_dir: Option<&Path>, cli: &CliOverrides) -> Result<()> {
    let base_dir = root_dir.unwrap_or_else(|| Path::new("."));
    let tracker_dir = base_dir.join(TRACKER_DIR_NAME);
    fs::create_dir_all(&tracker_dir)?;

    let resolved = ResolvedConfig::from_layer(&tracker_dir, &cli.as_layer())?;
    let db_path = resolved.db_path;

    if db_path.exists() {
        if !force {
            return Err(TrackerError::AlreadyInitialized { path: db_path });
        }
        remove_database(&db_path)?;
    }

    let mut storage = SqliteStorage::open(&db_path)?;
    storage.set_metadata("created_by_version", env!("CARGO_PKG_VERSION"))?;
    info!(path = %db_path.display(), "Created database");

    let config_path = tracker_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        fs::write(config_path, config::default_config_yaml())?;
    }

    let gitignore_path = tracker_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, "*.db\n*.db-shm\n*.db-wal\n*.log\n")?;
    }

    println!("Initialized tracker workspace in {TRACKER_DIR_NAME}/");
    Ok(())
}

fn remove_database(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_owned();
        sidecar.push(suffix);
        let _ = fs::remove_file(sidecar);
    }
    Ok(())
}
