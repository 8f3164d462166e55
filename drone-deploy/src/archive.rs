//! Scoped read access to JAR/ZIP archives.
//!
//! A [`JarArchive`] owns its file handle for the duration of one operation
//! and closes it on drop.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{DeployError, DeployResult};

/// Upper bound for buffer preallocation when reading an entry.
const MAX_PREALLOC: usize = 1 << 20;

/// An open JAR file.
pub struct JarArchive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
}

impl JarArchive {
    /// Open an archive for reading.
    pub fn open(path: &Path) -> DeployResult<Self> {
        let file = File::open(path).map_err(|source| DeployError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            DeployError::InvalidArchive {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            zip,
        })
    }

    /// First entry name (in archive order) matching `predicate`.
    pub fn find_entry(&self, predicate: impl Fn(&str) -> bool) -> Option<String> {
        self.zip
            .file_names()
            .find(|&name| predicate(name))
            .map(str::to_string)
    }

    /// Read an entry's bytes. `Ok(None)` when the entry does not exist.
    pub fn read_entry(&mut self, name: &str) -> DeployResult<Option<Vec<u8>>> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(DeployError::InvalidArchive {
                    path: self.path.clone(),
                    reason: format!("{}: {}", name, e),
                })
            }
        };

        let mut data = Vec::with_capacity(prealloc_capacity(entry.size()));
        entry
            .read_to_end(&mut data)
            .map_err(|e| DeployError::InvalidArchive {
                path: self.path.clone(),
                reason: format!("{}: {}", name, e),
            })?;
        Ok(Some(data))
    }

    /// Read an entry as UTF-8 text (lossy).
    pub fn read_entry_string(&mut self, name: &str) -> DeployResult<Option<String>> {
        Ok(self
            .read_entry(name)?
            .map(|data| String::from_utf8_lossy(&data).into_owned()))
    }
}

/// Buffer size to reserve for an entry whose header declares `declared`
/// bytes. Header sizes are not trusted.
fn prealloc_capacity(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOC, |size| size.min(MAX_PREALLOC))
}
