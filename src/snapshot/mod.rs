//! Persisted tree state for comparing scans across runs.

mod snapshot;

pub use snapshot::{Change, Snapshot, SnapshotEntry, SnapshotError};
