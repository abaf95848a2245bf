//! Backup-then-overwrite writes.
//!
//! Every mutation goes through [`write_with_backup`]: the original file is
//! copied to `<path>.backup.<YYYYmmdd_HHMMSS>` first and only then replaced.
//! If the process dies before the write, the original is untouched and a
//! backup copy may already exist next to it.

use std::fs;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::macros::format_description;

use crate::types::PatchError;

/// Timestamp for a backup file name, e.g. `20240131_235959`.
///
/// Uses local time, falling back to UTC when the local offset cannot be
/// determined (as on multi-threaded Unix processes).
pub fn backup_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_timestamp(now)
}

fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year][month][day]_[hour][minute][second]");
    at.format(format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Returns `<path>.backup.<stamp>`.
pub fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".backup.{stamp}"));
    PathBuf::from(name)
}

/// Copies `path` to a freshly stamped backup and returns the backup path.
pub fn create_backup(path: &Path) -> Result<PathBuf, PatchError> {
    let backup = backup_path(path, &backup_timestamp());
    fs::copy(path, &backup).map_err(|e| PatchError::io(&backup, e))?;
    Ok(backup)
}

/// Backs up `path`, then overwrites it with `contents`.
///
/// Returns the backup path.
pub fn write_with_backup(path: &Path, contents: &str) -> Result<PathBuf, PatchError> {
    let backup = create_backup(path)?;
    fs::write(path, contents).map_err(|e| PatchError::io(path, e))?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use time::macros::datetime;

    #[test]
    fn test_format_timestamp() {
        let at = datetime!(2024-01-31 23:59:07 UTC);
        assert_eq!(format_timestamp(at), "20240131_235907");
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        let path = Path::new("third-party/opus/BUILD");
        assert_eq!(
            backup_path(path, "20240131_235907"),
            PathBuf::from("third-party/opus/BUILD.backup.20240131_235907")
        );
    }

    #[test]
    fn test_backup_matches_original_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("BUILD");
        let original = "select({\n    \"//build-system:ios_sim_arm64\": [],\n})\n";
        fs::write(&path, original).unwrap();

        let backup = write_with_backup(&path, "patched\n").unwrap();

        assert_eq!(fs::read_to_string(&backup).unwrap(), original);
        assert_eq!(fs::read_to_string(&path).unwrap(), "patched\n");
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("BUILD.backup."), "unexpected name {name}");
        assert_eq!(name.len(), "BUILD.backup.".len() + "YYYYmmdd_HHMMSS".len());
    }

    #[test]
    fn test_missing_original_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent/BUILD");
        let err = write_with_backup(&path, "x").unwrap_err();
        assert!(matches!(err, PatchError::Io { .. }));
        assert!(!path.exists());
    }
}
