use std::{fs, path::Path};

use snafu::ResultExt;
use tracing::trace;

use crate::filesystem::error::{MetadataSnafu, NodeError};
use crate::filesystem::{ContentHash, NodeId, NodeKind, NodeMeta};

/// A regular file, its size and optionally its content hash.
#[derive(Debug, Clone)]
pub struct File {
    meta: NodeMeta,
    filesize: u64,
    hash: Option<ContentHash>,
}

impl File {
    /// Opens a standalone file node that has no parent directory.
    pub fn open(path: impl AsRef<Path>, hash_files: bool) -> Result<Self, NodeError> {
        Self::with_parent(path.as_ref(), None, hash_files)
    }

    pub(crate) fn with_parent(
        path: &Path,
        parent: Option<NodeId>,
        hash_files: bool,
    ) -> Result<Self, NodeError> {
        let meta = NodeMeta::capture(path, NodeKind::File, parent, hash_files)?;
        let mut file = Self {
            meta,
            filesize: 0,
            hash: None,
        };

        if hash_files {
            file.calculate_hash_and_size()?;
        } else {
            file.calculate_size()?;
        }

        Ok(file)
    }

    pub fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    pub fn path(&self) -> &Path {
        self.meta.path()
    }

    pub fn name(&self) -> &str {
        self.meta.name()
    }

    /// Size in bytes as of the last size or hash calculation.
    pub fn filesize(&self) -> u64 {
        self.filesize
    }

    /// The last computed hash, without touching the filesystem.
    pub fn cached_hash(&self) -> Option<&ContentHash> {
        self.hash.as_ref()
    }

    /// Content hash of this file.
    ///
    /// With hashing enabled for the subtree this is the value cached at
    /// construction or by the last [`refresh`](Self::refresh). Otherwise the
    /// file is re-read on every call, updating the size as well, so the
    /// result always reflects what is on disk.
    pub fn hash(&mut self) -> Result<&ContentHash, NodeError> {
        if !self.meta.hash_files() || self.hash.is_none() {
            self.calculate_hash_and_size()?;
        }
        Ok(self.hash.get_or_insert(ContentHash::Empty))
    }

    /// Refreshes the modification time and, when hashing is enabled, the
    /// size and hash. A changed hash counts as a change even if the
    /// modification time did not move.
    pub fn refresh(&mut self) -> Result<bool, NodeError> {
        let mut refreshed = self.meta.refresh()?;

        if self.meta.hash_files() {
            let previous_hash = self.hash;
            self.calculate_hash_and_size()?;
            if previous_hash != self.hash {
                trace!("Content of {} changed", self.path().display());
                refreshed = true;
            }
        }

        Ok(refreshed)
    }

    fn calculate_hash_and_size(&mut self) -> Result<(), NodeError> {
        let (hash, filesize) = ContentHash::of_file(self.meta.path())?;
        self.hash = Some(hash);
        self.filesize = filesize;
        Ok(())
    }

    fn calculate_size(&mut self) -> Result<(), NodeError> {
        self.filesize = fs::metadata(self.meta.path())
            .context(MetadataSnafu {
                path: self.meta.path(),
            })?
            .len();
        Ok(())
    }
}
