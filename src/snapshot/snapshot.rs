use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bincode::{Decode, Encode};
use derive_more::Display;
use hashlink::LinkedHashMap;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::filesystem::{ContentHash, Node, NodeKind, Tree};

const COMPRESSION_LEVEL: i32 = 3;
const ROOT_ENTRY_PATH: &str = ".";

/// What a single node looked like when the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SnapshotEntry {
    /// Path relative to the snapshot root, `.` for the root itself.
    pub path: String,
    pub kind: NodeKind,
    pub modified: SystemTime,
    pub size: u64,
    pub hash: Option<ContentHash>,
}

impl SnapshotEntry {
    fn from_node(node: &Node, root: &Path) -> Self {
        let relative = node
            .path()
            .strip_prefix(root)
            .map(|relative| relative.to_string_lossy().into_owned())
            .unwrap_or_else(|_| node.path().to_string_lossy().into_owned());
        let (size, hash) = match node {
            Node::File(file) => (file.filesize(), file.cached_hash().copied()),
            Node::Directory(_) => (0, None),
        };

        Self {
            path: if relative.is_empty() {
                ROOT_ENTRY_PATH.to_string()
            } else {
                relative
            },
            kind: node.kind(),
            modified: node.meta().last_modified(),
            size,
            hash,
        }
    }
}

/// One difference between two snapshots, keyed by root-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Change {
    #[display("+ {_0}")]
    Added(String),
    #[display("- {_0}")]
    Removed(String),
    #[display("~ {_0}")]
    Modified(String),
}

impl Change {
    pub fn path(&self) -> &str {
        match self {
            Change::Added(path) | Change::Removed(path) | Change::Modified(path) => path,
        }
    }
}

/// Persisted state of a scanned tree, used to report what changed between
/// two runs, including entries that were added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode)]
pub struct Snapshot {
    root: String,
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn capture(tree: &Tree) -> Self {
        Self::capture_excluding(tree, None)
    }

    /// Captures `tree`, leaving out `excluded` and any of its ancestors below
    /// the root. Used to keep a snapshot file stored inside the scanned tree
    /// out of its own diff.
    pub fn capture_excluding(tree: &Tree, excluded: Option<&Path>) -> Self {
        let root = tree.root().path();
        let entries = tree
            .iter()
            .map(|(_, node)| node)
            .filter(|node| !Self::is_excluded(node.path(), root, excluded))
            .map(|node| SnapshotEntry::from_node(node, root))
            .collect::<Vec<_>>();
        debug!("Captured snapshot with {} entries", entries.len());

        Self {
            root: root.to_string_lossy().into_owned(),
            entries,
        }
    }

    fn is_excluded(path: &Path, root: &Path, excluded: Option<&Path>) -> bool {
        match excluded {
            Some(excluded) => path != root && excluded.starts_with(path),
            None => false,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Reads a snapshot written by [`write`](Self::write). A missing file is
    /// not an error, it just means there is nothing to compare against yet.
    pub fn read(path: &Path) -> Result<Option<Self>, SnapshotError> {
        let compressed = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(
                    "No snapshot found at {}, starting fresh",
                    path.best_effort_path_display()
                );
                return Ok(None);
            }
            Err(error) => return Err(error).context(ReadSnafu { path }),
        };

        let bytes = zstd::decode_all(compressed.as_slice()).context(DecompressSnafu { path })?;
        let (snapshot, _) = bincode::decode_from_slice::<Self, _>(&bytes, bincode::config::standard())
            .context(DecodeSnafu { path })?;
        debug!(
            "Read snapshot of {} with {} entries",
            snapshot.root,
            snapshot.entries.len()
        );
        Ok(Some(snapshot))
    }

    pub fn write(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(WriteSnafu { path: parent })?;
        }

        let bytes = bincode::encode_to_vec(self, bincode::config::standard()).context(EncodeSnafu)?;
        let compressed =
            zstd::encode_all(bytes.as_slice(), COMPRESSION_LEVEL).context(CompressSnafu)?;
        fs::write(path, compressed).context(WriteSnafu { path })?;

        debug!("Wrote snapshot to {}", path.best_effort_path_display());
        Ok(())
    }

    /// Changes from `self` to `newer`: additions and modifications in the
    /// order of `newer`, then removals in the order of `self`.
    pub fn diff(&self, newer: &Snapshot) -> Vec<Change> {
        let mut remaining = self
            .entries
            .iter()
            .map(|entry| (entry.path.as_str(), entry))
            .collect::<LinkedHashMap<_, _>>();

        let mut changes = Vec::new();
        for entry in &newer.entries {
            match remaining.remove(entry.path.as_str()) {
                None => changes.push(Change::Added(entry.path.clone())),
                Some(previous) if previous != entry => {
                    changes.push(Change::Modified(entry.path.clone()))
                }
                Some(_) => {}
            }
        }

        changes.extend(
            remaining
                .keys()
                .map(|path| Change::Removed((*path).to_string())),
        );
        changes
    }
}

#[derive(Debug, Snafu)]
pub enum SnapshotError {
    #[snafu(display("Failed to read snapshot {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to decompress snapshot {}", path.best_effort_path_display()))]
    DecompressError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Snapshot {} is corrupt", path.best_effort_path_display()))]
    DecodeError {
        path: PathBuf,
        source: bincode::error::DecodeError,
    },
    #[snafu(display("Failed to encode snapshot"))]
    EncodeError { source: bincode::error::EncodeError },
    #[snafu(display("Failed to compress snapshot"))]
    CompressError { source: std::io::Error },
    #[snafu(display("Failed to write snapshot to {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
