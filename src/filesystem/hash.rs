use std::{fmt, fs, path::Path};

use bincode::{Decode, Encode};
use snafu::ResultExt;

use crate::filesystem::error::{NodeError, ReadSnafu};

/// Content fingerprint of a regular file.
///
/// Zero-byte files get [`ContentHash::Empty`] rather than the BLAKE3 digest of
/// no input, and render as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum ContentHash {
    Empty,
    Blake3([u8; blake3::OUT_LEN]),
}

impl ContentHash {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            ContentHash::Empty
        } else {
            ContentHash::Blake3(*blake3::hash(bytes).as_bytes())
        }
    }

    /// Reads the whole file and returns its hash along with the number of
    /// bytes read.
    pub fn of_file(path: &Path) -> Result<(Self, u64), NodeError> {
        let contents = fs::read(path).context(ReadSnafu {
            path: path.to_path_buf(),
        })?;
        Ok((Self::of_bytes(&contents), contents.len() as u64))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ContentHash::Empty)
    }

    pub fn to_hex(&self) -> String {
        match self {
            ContentHash::Empty => String::new(),
            ContentHash::Blake3(bytes) => blake3::Hash::from_bytes(*bytes).to_hex().to_string(),
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
