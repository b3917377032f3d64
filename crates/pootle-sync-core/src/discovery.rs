use std::fs::ReadDir;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::RESERVED_TMP_DIR;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot list projects root '{}': {source}", .path.display())]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lists project directories under a fixed root.
#[derive(Debug, Clone)]
pub struct ProjectDiscovery {
    root: PathBuf,
}

impl ProjectDiscovery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts a fresh listing of the root.
    ///
    /// Every call re-reads the filesystem, so two passes may disagree if directories
    /// were added or removed in between. Order follows the platform's directory listing.
    pub fn projects(&self) -> Result<Projects, DiscoveryError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| DiscoveryError::ReadRoot {
            path: self.root.clone(),
            source,
        })?;
        debug!("listing projects under {}", self.root.display());
        Ok(Projects { entries })
    }
}

/// Lazy sequence of project identifiers from one directory listing.
#[derive(Debug)]
pub struct Projects {
    entries: ReadDir,
}

impl Iterator for Projects {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            // Follows symlinks, so a linked project directory still counts.
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("skipping directory with non-UTF-8 name: {:?}", raw);
                    continue;
                }
            };

            if name == RESERVED_TMP_DIR {
                continue;
            }

            return Some(name);
        }
        None
    }
}
