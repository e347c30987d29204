//! pathed: an in-memory model of a filesystem subtree.
//!
//! Scan a directory into a [`filesystem::Tree`], query metadata of its
//! directories and files, fingerprint file contents with BLAKE3, and ask the
//! tree whether anything changed since it was last observed.

pub mod config;
pub mod ext;
pub mod filesystem;
pub mod snapshot;
