//! Filesystem helpers for crash-safe writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `bytes` to `destination` via a sibling temp file and a rename.
///
/// Readers either see the previous contents or the new contents, never a
/// partial file. The parent directory is created if missing.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or the rename fails
/// even after the fallback attempt.
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_sibling(destination);
    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    replace_file(&temp_path, destination)
}

fn temp_sibling(destination: &Path) -> PathBuf {
    let file_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "templates".to_string());
    destination.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

/// Move the temp file over `destination`.
///
/// Some platforms refuse to rename onto an existing file, so a failed first
/// attempt removes the destination and tries once more. The temp file never
/// outlives a failure.
fn replace_file(temp_path: &Path, destination: &Path) -> io::Result<()> {
    let first = match fs::rename(temp_path, destination) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };
    let _ = fs::remove_file(destination);
    fs::rename(temp_path, destination).map_err(|second| {
        let _ = fs::remove_file(temp_path);
        io::Error::new(
            second.kind(),
            format!("could not replace {} ({first}; then {second})", destination.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parent() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("nested").join("templates.json");

        write_atomic(&dest, b"[]").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "[]");
    }

    #[test]
    fn test_write_atomic_replaces_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("templates.json");

        write_atomic(&dest, b"old").unwrap();
        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
