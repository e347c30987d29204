use std::path::PathBuf;

use pathed::config::ScanConfig;
use pathed::filesystem::{DepthLimit, ScanOptions};
use supports_color::Stream;

use crate::cli::Cli;

/// Settings given on the command line. Values left unset here fall back to
/// the root's config file.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub hash_files: bool,
    pub recursive: bool,
    pub depth: Option<u32>,
    pub legacy_budget: Option<i64>,
    pub snapshot: Option<PathBuf>,
    pub color: bool,
}

impl RuntimeConfig {
    pub fn scan_options(&self, file_config: &ScanConfig) -> ScanOptions {
        let hash_files = self.hash_files || file_config.hash_files.unwrap_or(false);

        let depth = if let Some(budget) = self.legacy_budget {
            DepthLimit::Budget(budget)
        } else if self.recursive || self.depth.is_some() {
            ScanOptions::from_flags(hash_files, self.recursive, self.depth.unwrap_or(0)).depth
        } else if let Some(budget) = file_config.legacy_budget {
            DepthLimit::Budget(budget)
        } else {
            ScanOptions::from_flags(
                hash_files,
                file_config.recursive.unwrap_or(false),
                file_config.depth.unwrap_or(0),
            )
            .depth
        };

        ScanOptions::new()
            .with_hash_files(hash_files)
            .with_depth(depth)
    }

    /// The snapshot to compare against. A path from the config file is
    /// relative to the scanned root, one from the command line to the
    /// current directory.
    pub fn snapshot_path(&self, file_config: &ScanConfig) -> Option<PathBuf> {
        self.snapshot
            .clone()
            .or_else(|| file_config.snapshot.as_ref().map(|path| self.root.join(path)))
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            hash_files: cli.hash_files,
            recursive: cli.recursive,
            depth: cli.depth,
            legacy_budget: cli.legacy_budget,
            snapshot: cli.snapshot,
            color: !cli.no_color && supports_color::on(Stream::Stdout).is_some(),
        }
    }
}
