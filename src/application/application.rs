use std::io::{self, Write};
use std::path::Path;

use pathed::config::{ScanConfig, ScanConfigError};
use pathed::ext::absolutize;
use pathed::filesystem::{NodeError, Tree};
use pathed::snapshot::Snapshot;
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::{ChangeList, Report, RuntimeConfig};

pub struct Application;

impl Application {
    pub fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        colored::control::set_override(runtime_config.color);

        let file_config = ScanConfig::read(&runtime_config.root).context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", file_config);

        let options = runtime_config.scan_options(&file_config);
        let tree = Tree::scan(&runtime_config.root, options).context(ScanSnafu)?;
        info!(
            "Scanned {} nodes under {}",
            tree.len(),
            tree.root().path().display()
        );

        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", Report::new(&tree)).context(OutputSnafu)?;

        if let Some(snapshot_path) = runtime_config.snapshot_path(&file_config) {
            Self::compare_with_snapshot(&tree, &snapshot_path, &mut stdout)?;
        }

        Ok(())
    }

    /// Prints what changed since the snapshot at `path` was written, then
    /// replaces it with the current state.
    fn compare_with_snapshot(
        tree: &Tree,
        path: &Path,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError> {
        let snapshot_location = absolutize(path).ok();
        let current = Snapshot::capture_excluding(tree, snapshot_location.as_deref());

        match Snapshot::read(path).context(SnapshotSnafu)? {
            Some(previous) => {
                if previous.root() != current.root() {
                    warn!(
                        "Snapshot was taken of {}, comparing it with {} anyway",
                        previous.root(),
                        current.root()
                    );
                }
                let changes = previous.diff(&current);
                info!("Found {} changes since the last snapshot", changes.len());
                write!(out, "{}", ChangeList(&changes)).context(OutputSnafu)?;
            }
            None => {
                writeln!(out, "No previous snapshot, recording the current state")
                    .context(OutputSnafu)?;
            }
        }

        current.write(path).context(SnapshotSnafu)?;
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ScanConfigError },
    #[snafu(display("Critical failure encountered while scanning"))]
    ScanError { source: NodeError },
    #[snafu(display("Failed to compare against the snapshot"))]
    SnapshotError {
        source: pathed::snapshot::SnapshotError,
    },
    #[snafu(display("Failed to write the report"))]
    OutputError { source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn runtime_config(root: &Path, snapshot: Option<PathBuf>) -> RuntimeConfig {
        RuntimeConfig {
            root: root.to_path_buf(),
            recursive: true,
            hash_files: true,
            snapshot,
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn run_writes_and_compares_snapshots() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("data.txt"), "payload").expect("Failed to write file");
        let state_dir = TempDir::new().expect("Failed to create temp directory");
        let snapshot_path = state_dir.path().join("snapshot.bin");

        Application::run(runtime_config(temp_dir.path(), Some(snapshot_path.clone())))
            .expect("First run failed");
        let first = Snapshot::read(&snapshot_path)
            .expect("Failed to read snapshot")
            .expect("Snapshot should exist after the first run");

        fs::write(temp_dir.path().join("data.txt"), "new payload").expect("Failed to write file");
        Application::run(runtime_config(temp_dir.path(), Some(snapshot_path.clone())))
            .expect("Second run failed");
        let second = Snapshot::read(&snapshot_path)
            .expect("Failed to read snapshot")
            .expect("Snapshot should exist after the second run");

        assert!(
            first
                .diff(&second)
                .contains(&pathed::snapshot::Change::Modified("data.txt".to_string()))
        );
    }

    #[test]
    fn snapshot_inside_root_stays_out_of_the_diff() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let snapshot_path = temp_dir.path().join(".pathed").join("snapshot.bin");

        Application::run(runtime_config(temp_dir.path(), Some(snapshot_path.clone())))
            .expect("First run failed");
        Application::run(runtime_config(temp_dir.path(), Some(snapshot_path.clone())))
            .expect("Second run failed");

        let snapshot = Snapshot::read(&snapshot_path)
            .expect("Failed to read snapshot")
            .expect("Snapshot should exist");
        assert!(
            snapshot
                .entries()
                .iter()
                .all(|entry| !entry.path.starts_with(".pathed"))
        );
    }

    #[test]
    fn run_fails_on_a_regular_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("file.txt");
        fs::write(&file_path, "x").expect("Failed to write file");

        let result = Application::run(runtime_config(&file_path, None));

        assert!(matches!(
            result,
            Err(ApplicationError::ScanError {
                source: NodeError::NotADirectory { .. }
            })
        ));
    }

    #[test]
    fn run_fails_on_invalid_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join(".pathed.yaml"), "depth: deep").expect("Failed to write");

        let result = Application::run(runtime_config(temp_dir.path(), None));

        assert!(matches!(result, Err(ApplicationError::ConfigError { .. })));
    }
}
