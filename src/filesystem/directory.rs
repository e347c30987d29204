use std::path::Path;

use crate::filesystem::{DepthLimit, NodeId, NodeMeta};

/// A scanned directory. Children live in the owning
/// [`Tree`](crate::filesystem::Tree) and are referenced by id, in the order
/// the filesystem listed them.
#[derive(Debug, Clone)]
pub struct Directory {
    meta: NodeMeta,
    sub_dirs: Vec<NodeId>,
    files: Vec<NodeId>,
    empty: bool,
    depth: DepthLimit,
}

impl Directory {
    pub(crate) fn new(meta: NodeMeta, depth: DepthLimit) -> Self {
        Self {
            meta,
            sub_dirs: Vec::new(),
            files: Vec::new(),
            empty: false,
            depth,
        }
    }

    pub(crate) fn populate(&mut self, sub_dirs: Vec<NodeId>, files: Vec<NodeId>, empty: bool) {
        self.sub_dirs = sub_dirs;
        self.files = files;
        self.empty = empty;
    }

    pub fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    pub(crate) fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    pub fn path(&self) -> &Path {
        self.meta.path()
    }

    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn sub_dirs(&self) -> &[NodeId] {
        &self.sub_dirs
    }

    pub fn files(&self) -> &[NodeId] {
        &self.files
    }

    /// Child directories followed by child files.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.sub_dirs.iter().chain(self.files.iter()).copied()
    }

    /// True if the directory had no entries at all when it was scanned.
    /// A directory whose subdirectories were all cut off by the depth limit
    /// is not empty.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// The depth limit this directory was scanned with.
    pub fn depth(&self) -> DepthLimit {
        self.depth
    }

    pub fn is_recursive(&self) -> bool {
        self.depth.is_recursive()
    }
}
