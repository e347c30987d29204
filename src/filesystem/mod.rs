//! Filesystem tree representation with change tracking capabilities.
//!
//! A [`Tree`] is built by eagerly scanning a directory. Its nodes are either
//! directories, which reference their children, or files, which carry a size
//! and an optional BLAKE3 content hash. [`Tree::refresh`] walks every node
//! and reports whether anything changed on disk since the last observation.

mod directory;
mod error;
mod file;
mod hash;
mod node;
mod scan;
mod tree;

pub use directory::Directory;
pub use error::NodeError;
pub use file::File;
pub use hash::ContentHash;
pub use node::{Node, NodeId, NodeKind, NodeMeta};
pub use scan::{DepthLimit, ScanOptions, ScanStats};
pub use tree::Tree;
