use std::path::{Path, PathBuf};

use snafu::Snafu;

use crate::ext::BestEffortPathExt;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum NodeError {
    #[snafu(display("Expected a directory at {}", path.best_effort_path_display()))]
    NotADirectory { path: PathBuf },
    #[snafu(display("Expected a regular file at {}", path.best_effort_path_display()))]
    NotAFile { path: PathBuf },
    #[snafu(display(
        "Unknown directory entry {}: neither a regular file nor a directory",
        path.best_effort_path_display()
    ))]
    UnknownEntry { path: PathBuf },
    #[snafu(display("Failed to resolve an absolute path for {}", path.display()))]
    AbsolutePathError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read metadata of {}", path.best_effort_path_display()))]
    MetadataError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to list directory {}", path.best_effort_path_display()))]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read contents of {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl NodeError {
    /// The path the failing operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            NodeError::NotADirectory { path }
            | NodeError::NotAFile { path }
            | NodeError::UnknownEntry { path }
            | NodeError::AbsolutePathError { path, .. }
            | NodeError::MetadataError { path, .. }
            | NodeError::ListError { path, .. }
            | NodeError::ReadError { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_error_display() {
        let not_a_dir = NodeError::NotADirectory {
            path: PathBuf::from("/tmp/file.txt"),
        };
        let unknown = NodeError::UnknownEntry {
            path: PathBuf::from("/tmp/socket"),
        };
        let read = NodeError::ReadError {
            path: PathBuf::from("/this/path/does/not/exist.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };

        assert!(not_a_dir.to_string().contains("Expected a directory"));
        assert!(not_a_dir.to_string().contains("/tmp/file.txt"));
        assert!(unknown.to_string().contains("neither a regular file nor a directory"));
        assert!(read.to_string().contains("/this/path/does/not/exist.txt"));
    }

    #[test]
    fn test_node_error_path() {
        let error = NodeError::ListError {
            path: PathBuf::from("/var/empty"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.path(), Path::new("/var/empty"));
    }
}
