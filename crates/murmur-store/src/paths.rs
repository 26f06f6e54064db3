use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "murmur";
const DB_FILENAME: &str = "murmur.sqlite3";

pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_DATA_HOME") {
        let path = PathBuf::from(dir);
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidDataPath(path));
        }
        return Ok(path.join(APP_DIR));
    }

    let home = dirs::home_dir().ok_or(StoreError::MissingHomeDir)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}

pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = data_dir()?;
    ensure_private_dir(&dir)?;
    Ok(dir)
}

/// Resolves the database location, honouring an explicit override and
/// creating the containing directory when needed.
pub fn resolve_db_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(StoreError::InvalidDataPath(path));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.exists() {
                    ensure_private_dir(parent)?;
                }
            }
            Ok(path)
        }
        None => Ok(db_path_in(&ensure_data_dir()?)),
    }
}

pub fn db_path_in(dir: &Path) -> PathBuf {
    dir.join(DB_FILENAME)
}

fn ensure_private_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    restrict_dir_permissions(dir)
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o700);
    fs::set_permissions(dir, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{db_path_in, resolve_db_path};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_creates_missing_parent() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("comments.sqlite3");
        let resolved = resolve_db_path(Some(path.clone())).expect("resolve");
        assert_eq!(resolved, path);
        assert!(temp.path().join("nested").is_dir());
    }

    #[test]
    fn empty_override_is_rejected() {
        assert!(resolve_db_path(Some(PathBuf::new())).is_err());
    }

    #[test]
    fn db_file_name_is_stable() {
        let path = db_path_in(&PathBuf::from("/data/murmur"));
        assert!(path.ends_with("murmur.sqlite3"));
    }
}
