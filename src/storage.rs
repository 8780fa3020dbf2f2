//! Key file access for the command line tool.
//!
//! The code generation itself never touches the filesystem, everything here
//! just moves bytes between disk and [StoredKeyRecord].

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::secret::{KeyError, StoredKeyRecord};

/// Failure reading or writing a key file.
#[derive(Debug)]
pub enum StorageError {
    /// The file doesn't exist.
    NotFound(PathBuf),
    /// Any other I/O failure on the file.
    Io(PathBuf, io::Error),
    /// The file was read, but its content is not a usable key.
    Key(KeyError),
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::NotFound(_) => None,
            StorageError::Io(_, err) => Some(err),
            StorageError::Key(err) => Some(err),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(path) => write!(f, "key file {} not found.", path.display()),
            StorageError::Io(path, err) => write!(f, "could not access {}: {}", path.display(), err),
            StorageError::Key(err) => write!(f, "{}", err),
        }
    }
}

impl From<KeyError> for StorageError {
    fn from(err: KeyError) -> Self {
        StorageError::Key(err)
    }
}

fn map_io(path: &Path, err: io::Error) -> StorageError {
    if err.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(path.to_path_buf())
    } else {
        StorageError::Io(path.to_path_buf(), err)
    }
}

/// Read a stored record, verbatim.
pub fn load<P: AsRef<Path>>(path: P) -> Result<StoredKeyRecord, StorageError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| map_io(path, err))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(StoredKeyRecord::from(bytes))
}

/// Read the text file holding the hex key given on the command line.
pub fn read_key_input<P: AsRef<Path>>(path: P) -> Result<String, StorageError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|err| map_io(path, err))
}

/// Replace the content of `path` with `record`.
///
/// The record is written to a temporary file next to `path`, then renamed over it,
/// so `path` either keeps its old content or gets the whole new record.
/// On unix the file is only readable by its owner.
pub fn save<P: AsRef<Path>>(path: P, record: &StoredKeyRecord) -> Result<(), StorageError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|err| map_io(dir, err))?;
    file.write_all(record.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .map_err(|err| StorageError::Io(file.path().to_path_buf(), err))?;
    file.persist(path)
        .map_err(|err| StorageError::Io(path.to_path_buf(), err.error))?;

    log::debug!("wrote {} bytes to {}", record.as_bytes().len(), path.display());
    Ok(())
}
