use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use bincode::{Decode, Encode};
use derive_more::Display;
use snafu::ResultExt;
use tracing::trace;

use crate::ext::{absolutize, path_name};
use crate::filesystem::error::{
    AbsolutePathSnafu, MetadataSnafu, NodeError, NotADirectorySnafu, NotAFileSnafu,
};
use crate::filesystem::{Directory, File};

/// Stable handle of a node inside a [`Tree`](crate::filesystem::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// The two kinds of entries a tree is allowed to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Encode, Decode)]
pub enum NodeKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

impl NodeKind {
    /// Classifies `path`, following symlinks. Returns `None` for anything that
    /// is neither a directory nor a regular file, including paths that cannot
    /// be stat'ed such as broken symlinks.
    pub fn of(path: &Path) -> Option<NodeKind> {
        let metadata = fs::metadata(path).ok()?;
        if metadata.is_dir() {
            Some(NodeKind::Directory)
        } else if metadata.is_file() {
            Some(NodeKind::File)
        } else {
            None
        }
    }

    fn validate(self, path: &Path) -> Result<(), NodeError> {
        match (self, NodeKind::of(path)) {
            (NodeKind::Directory, Some(NodeKind::Directory)) => Ok(()),
            (NodeKind::File, Some(NodeKind::File)) => Ok(()),
            (NodeKind::Directory, _) => NotADirectorySnafu { path }.fail(),
            (NodeKind::File, _) => NotAFileSnafu { path }.fail(),
        }
    }
}

/// Identity and timestamps shared by directories and files.
#[derive(Debug, Clone)]
pub struct NodeMeta {
    path: PathBuf,
    name: String,
    parent: Option<NodeId>,
    created_at: SystemTime,
    last_modified: SystemTime,
    hash_files: bool,
}

impl NodeMeta {
    /// Validates `path` against `kind` and snapshots its timestamps.
    pub(crate) fn capture(
        path: &Path,
        kind: NodeKind,
        parent: Option<NodeId>,
        hash_files: bool,
    ) -> Result<Self, NodeError> {
        kind.validate(path)?;

        let path = absolutize(path).context(AbsolutePathSnafu { path })?;
        let metadata = fs::metadata(&path).context(MetadataSnafu { path: &path })?;
        let last_modified = metadata
            .modified()
            .context(MetadataSnafu { path: &path })?;
        // Not every filesystem records a birth time
        let created_at = metadata.created().unwrap_or(last_modified);

        Ok(Self {
            name: path_name(&path),
            path,
            parent,
            created_at,
            last_modified,
            hash_files,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    /// Whether content hashes are cached for files in this subtree.
    pub fn hash_files(&self) -> bool {
        self.hash_files
    }

    /// Compares the live modification time with the stored one, storing the
    /// live value when they differ. Returns whether they differed.
    pub(crate) fn refresh(&mut self) -> Result<bool, NodeError> {
        let live_modified = fs::metadata(&self.path)
            .and_then(|metadata| metadata.modified())
            .context(MetadataSnafu { path: &self.path })?;

        let refreshed = live_modified != self.last_modified;
        if refreshed {
            trace!("Modification time of {} changed", self.path.display());
            self.last_modified = live_modified;
        }

        Ok(refreshed)
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Directory(Directory),
    File(File),
}

impl Node {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            Node::Directory(directory) => directory.meta(),
            Node::File(file) => file.meta(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory(_) => NodeKind::Directory,
            Node::File(_) => NodeKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind() == NodeKind::File
    }

    pub fn path(&self) -> &Path {
        self.meta().path()
    }

    pub fn name(&self) -> &str {
        self.meta().name()
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(directory) => Some(directory),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }
}
