//! Filesystem operations
//!
//! Reads inputs and writes outputs. Every write goes to a temporary file in
//! the destination directory that is renamed over the target only once the
//! content is complete. A replaced file keeps its permissions; a new one gets
//! the usual `0666` minus the umask.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::Builder;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read a file as bytes
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, FilesystemError> {
    std::fs::read(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write a file atomically through `fill`
///
/// Parent directories are created as needed. If `fill` fails, the target is
/// left untouched and the temporary file is removed.
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<(), FilesystemError>
where
    F: FnOnce(&mut BufWriter<&File>) -> io::Result<()>,
{
    let write_err = |e: io::Error| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    create_dir_all(parent)?;

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let temp = builder.tempfile_in(parent).map_err(write_err)?;
    if let Ok(existing) = std::fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }
    {
        let mut writer = BufWriter::new(temp.as_file());
        fill(&mut writer).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    write_atomic(path, |out| out.write_all(content.as_bytes()))
}
