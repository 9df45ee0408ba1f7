//! Key-store conventions
//!
//! Default identity files live in a per-user storage root (`~/.dsig` on
//! Unix-likes), one private/public pair per algorithm id, named by the
//! fixed table in [`crate::algo::key_basename`]. The root is created on
//! first use with owner-only permissions.

use std::fs;
use std::path::PathBuf;

use crate::algo;
use crate::error::Result;

/// Directory name under the user's home directory
const APP_DIR: &str = ".dsig";

/// Resolve (and create if absent) the per-user storage root.
pub fn storage_root() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
    })?;
    let root = home.join(APP_DIR);
    ensure_private_dir(&root)?;
    Ok(root)
}

/// Default private identity file for an algorithm id.
pub fn identity_file(id: &str) -> Result<PathBuf> {
    Ok(storage_root()?.join(algo::key_basename(id)))
}

/// Default public identity file for an algorithm id.
pub fn public_identity_file(id: &str) -> Result<PathBuf> {
    Ok(storage_root()?.join(format!("{}.pub", algo::key_basename(id))))
}

fn ensure_private_dir(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_private_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");

        ensure_private_dir(&root).unwrap();
        assert!(root.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&root).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn test_ensure_private_dir_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        ensure_private_dir(dir.path()).unwrap();
        ensure_private_dir(dir.path()).unwrap();
    }

    #[test]
    fn test_default_paths_share_basename() {
        if dirs::home_dir().is_none() {
            return;
        }
        let private = identity_file("openpgp:dsa").unwrap();
        let public = public_identity_file("openpgp:dsa").unwrap();

        assert_eq!(private.file_name().unwrap(), "id_openpgp_dsa");
        assert_eq!(public.file_name().unwrap(), "id_openpgp_dsa.pub");
        assert_eq!(private.parent(), public.parent());
    }
}
