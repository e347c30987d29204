use tracing::debug;

use crate::filesystem::File;

/// How far below a directory the scan may descend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimit {
    /// Descend until the subtree is exhausted.
    Unbounded,
    /// Descend at most this many directory levels. `Levels(0)` keeps only the
    /// directory's own files.
    Levels(u32),
    /// Legacy depth budget. A directory holding a budget `b >= 0` builds its
    /// child directories with `b - 1`; a negative budget builds none. This
    /// means a budget of `b` reaches `b + 1` levels down, so `Budget(0)` still
    /// builds one level of child directories.
    Budget(i64),
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit::Levels(0)
    }
}

impl DepthLimit {
    /// The limit child directories are scanned with, or `None` when child
    /// directories are not built at all.
    pub fn descend(self) -> Option<DepthLimit> {
        match self {
            DepthLimit::Unbounded => Some(DepthLimit::Unbounded),
            DepthLimit::Levels(0) => None,
            DepthLimit::Levels(levels) => Some(DepthLimit::Levels(levels - 1)),
            DepthLimit::Budget(budget) if budget >= 0 => Some(DepthLimit::Budget(budget - 1)),
            DepthLimit::Budget(_) => None,
        }
    }

    pub fn is_recursive(self) -> bool {
        self.descend().is_some()
    }
}

/// Construction options for [`Tree::scan`](crate::filesystem::Tree::scan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Hash file contents during the scan and cache the result. When off,
    /// every hash read goes back to disk.
    pub hash_files: bool,
    pub depth: DepthLimit,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the `recursive` / `recursive_depth` pair: a positive depth bounds
    /// the scan to that many levels whether or not `recursive` is set, a zero
    /// depth means unbounded when `recursive` is set and no descent otherwise.
    pub fn from_flags(hash_files: bool, recursive: bool, recursive_depth: u32) -> Self {
        let depth = match (recursive, recursive_depth) {
            (_, levels @ 1..) => DepthLimit::Levels(levels),
            (true, 0) => DepthLimit::Unbounded,
            (false, 0) => DepthLimit::Levels(0),
        };
        Self { hash_files, depth }
    }

    pub fn with_hash_files(mut self, hash_files: bool) -> Self {
        self.hash_files = hash_files;
        self
    }

    pub fn with_depth(mut self, depth: DepthLimit) -> Self {
        self.depth = depth;
        self
    }

    pub fn recursive(self) -> Self {
        self.with_depth(DepthLimit::Unbounded)
    }
}

/// Counters collected while one tree is scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub directories: usize,
    pub files: usize,
    pub hashed_files: usize,
    pub total_bytes: u64,
    /// Child directories left out because of the depth limit.
    pub skipped_directories: usize,
}

impl ScanStats {
    pub(crate) fn record_file(&mut self, file: &File) {
        self.files += 1;
        self.total_bytes += file.filesize();
        if file.cached_hash().is_some() {
            self.hashed_files += 1;
        }
        debug!(
            files = self.files,
            "Discovered file {}",
            file.meta().path().display()
        );
    }

    pub(crate) fn record_directory(&mut self) {
        self.directories += 1;
    }

    pub(crate) fn record_skipped_directory(&mut self) {
        self.skipped_directories += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(DepthLimit::Unbounded, Some(DepthLimit::Unbounded))]
    #[case(DepthLimit::Levels(0), None)]
    #[case(DepthLimit::Levels(2), Some(DepthLimit::Levels(1)))]
    #[case(DepthLimit::Budget(1), Some(DepthLimit::Budget(0)))]
    #[case(DepthLimit::Budget(0), Some(DepthLimit::Budget(-1)))]
    #[case(DepthLimit::Budget(-1), None)]
    fn test_depth_limit_descend(#[case] limit: DepthLimit, #[case] expected: Option<DepthLimit>) {
        assert_eq!(limit.descend(), expected);
    }

    #[rstest]
    #[case(false, 0, DepthLimit::Levels(0))]
    #[case(true, 0, DepthLimit::Unbounded)]
    #[case(false, 2, DepthLimit::Levels(2))]
    #[case(true, 3, DepthLimit::Levels(3))]
    fn test_scan_options_from_flags(
        #[case] recursive: bool,
        #[case] recursive_depth: u32,
        #[case] expected: DepthLimit,
    ) {
        let options = ScanOptions::from_flags(true, recursive, recursive_depth);
        assert!(options.hash_files);
        assert_eq!(options.depth, expected);
    }

    #[test]
    fn test_default_options_do_not_recurse() {
        let options = ScanOptions::new();
        assert!(!options.hash_files);
        assert!(!options.depth.is_recursive());
        assert!(options.recursive().depth.is_recursive());
    }
}
