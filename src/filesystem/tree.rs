use std::fs;
use std::path::Path;

use snafu::ResultExt;
use tracing::{debug, trace};

use crate::ext::absolutize;
use crate::filesystem::error::{ListSnafu, NodeError, UnknownEntrySnafu};
use crate::filesystem::{
    DepthLimit, Directory, File, Node, NodeId, NodeKind, NodeMeta, ScanOptions, ScanStats,
};

/// An eagerly scanned filesystem subtree.
///
/// Nodes are stored in scan order (parent first, depth first), so the root is
/// always the first node and a directory always precedes its descendants.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    options: ScanOptions,
    stats: ScanStats,
}

impl Tree {
    const ROOT: NodeId = NodeId::ROOT;

    /// Scans the directory at `path` and everything below it that `options`
    /// allows. Any failure aborts the whole scan.
    pub fn scan(path: impl AsRef<Path>, options: ScanOptions) -> Result<Self, NodeError> {
        let path = path.as_ref();
        debug!("Scanning {} with {:?}", path.display(), options);

        let mut tree = Self {
            nodes: Vec::new(),
            options,
            stats: ScanStats::default(),
        };
        tree.scan_directory(path, None, options.depth)?;

        debug!(
            "Scanned {} directories and {} files ({} bytes) under {}",
            tree.stats.directories,
            tree.stats.files,
            tree.stats.total_bytes,
            tree.root().path().display()
        );
        Ok(tree)
    }

    fn scan_directory(
        &mut self,
        path: &Path,
        parent: Option<NodeId>,
        depth: DepthLimit,
    ) -> Result<NodeId, NodeError> {
        let hash_files = self.options.hash_files;
        let meta = NodeMeta::capture(path, NodeKind::Directory, parent, hash_files)?;
        let dir_path = meta.path().to_path_buf();
        let id = self.push(Node::Directory(Directory::new(meta, depth)));
        self.stats.record_directory();

        let entries = fs::read_dir(&dir_path).context(ListSnafu { path: &dir_path })?;

        let mut sub_dirs = Vec::new();
        let mut files = Vec::new();
        let mut entry_count = 0usize;

        for entry in entries {
            let entry = entry.context(ListSnafu { path: &dir_path })?;
            let entry_path = dir_path.join(entry.file_name());
            entry_count += 1;

            match NodeKind::of(&entry_path) {
                Some(NodeKind::Directory) => match depth.descend() {
                    Some(child_depth) => {
                        sub_dirs.push(self.scan_directory(&entry_path, Some(id), child_depth)?);
                    }
                    None => {
                        trace!("Depth limit reached, skipping {}", entry_path.display());
                        self.stats.record_skipped_directory();
                    }
                },
                Some(NodeKind::File) => {
                    let file = File::with_parent(&entry_path, Some(id), hash_files)?;
                    self.stats.record_file(&file);
                    files.push(self.push(Node::File(file)));
                }
                None => return UnknownEntrySnafu { path: entry_path }.fail(),
            }
        }

        if let Some(Node::Directory(directory)) = self.nodes.get_mut(id.index()) {
            directory.populate(sub_dirs, files, entry_count == 0);
        }

        Ok(id)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn root_id(&self) -> NodeId {
        Self::ROOT
    }

    pub fn root(&self) -> &Directory {
        match self.nodes.first() {
            Some(Node::Directory(directory)) => directory,
            _ => unreachable!("a scanned tree always starts with its root directory"),
        }
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Counters collected while this tree was scanned.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn directory(&self, id: NodeId) -> Option<&Directory> {
        self.node(id).and_then(Node::as_directory)
    }

    pub fn file(&self, id: NodeId) -> Option<&File> {
        self.node(id).and_then(Node::as_file)
    }

    pub fn file_mut(&mut self, id: NodeId) -> Option<&mut File> {
        self.nodes.get_mut(id.index()).and_then(Node::as_file_mut)
    }

    /// The directory that owns `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<&Directory> {
        let parent = self.node(id)?.meta().parent()?;
        self.directory(parent)
    }

    pub fn sub_dirs<'a>(&'a self, directory: &'a Directory) -> impl Iterator<Item = &'a Directory> {
        directory
            .sub_dirs()
            .iter()
            .filter_map(|id| self.directory(*id))
    }

    pub fn files<'a>(&'a self, directory: &'a Directory) -> impl Iterator<Item = &'a File> {
        directory.files().iter().filter_map(|id| self.file(*id))
    }

    /// Looks a node up by path. Relative paths are resolved against the
    /// current directory.
    pub fn find(&self, path: impl AsRef<Path>) -> Option<NodeId> {
        let path = absolutize(path.as_ref()).ok()?;
        self.iter()
            .find(|(_, node)| node.path() == path)
            .map(|(id, _)| id)
    }

    /// All nodes in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::new(index), node))
    }

    /// Re-checks every node against the filesystem. Returns whether anything
    /// changed since construction or the previous refresh.
    pub fn refresh(&mut self) -> Result<bool, NodeError> {
        self.refresh_subtree(Self::ROOT)
    }

    /// Like [`refresh`](Self::refresh) but limited to the subtree at `id`.
    pub fn refresh_subtree(&mut self, id: NodeId) -> Result<bool, NodeError> {
        let mut changed = Vec::new();
        self.refresh_node(id, &mut changed)
    }

    /// Refreshes the whole tree and returns the nodes that reported a change,
    /// in scan order.
    pub fn refresh_changes(&mut self) -> Result<Vec<NodeId>, NodeError> {
        let mut changed = Vec::new();
        self.refresh_node(Self::ROOT, &mut changed)?;
        changed.sort();
        Ok(changed)
    }

    // Every node is visited, a change found early never stops the walk
    fn refresh_node(&mut self, id: NodeId, changed: &mut Vec<NodeId>) -> Result<bool, NodeError> {
        let (mut refreshed, children) = match self.nodes.get_mut(id.index()) {
            Some(Node::File(file)) => (file.refresh()?, Vec::new()),
            Some(Node::Directory(directory)) => (
                directory.meta_mut().refresh()?,
                directory.children().collect::<Vec<_>>(),
            ),
            None => return Ok(false),
        };

        if refreshed {
            changed.push(id);
        }

        for child in children {
            refreshed |= self.refresh_node(child, changed)?;
        }

        Ok(refreshed)
    }
}
