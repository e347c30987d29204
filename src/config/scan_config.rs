use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::ext::BestEffortPathExt;

const CONFIG_FILE_NAME: &str = ".pathed.yaml";
const KNOWN_KEYS: [&str; 5] = [
    "hash_files",
    "recursive",
    "depth",
    "legacy_budget",
    "snapshot",
];

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Scan settings read from `.pathed.yaml` in the scanned root. Every field is
/// optional so command line flags can be layered on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanConfig {
    pub hash_files: Option<bool>,
    pub recursive: Option<bool>,
    pub depth: Option<u32>,
    pub legacy_budget: Option<i64>,
    /// Snapshot location, relative to the scanned root unless absolute.
    pub snapshot: Option<PathBuf>,
}

impl ScanConfig {
    /// Reads the config file of `root`, falling back to defaults when there
    /// is none.
    pub fn read(root: &Path) -> Result<Self, ScanConfigError> {
        let path = get_config_file_path(root);
        match Self::from_path(&path) {
            // A root that is not a directory is reported by the scan itself
            Err(ScanConfigError::ReadError { source, .. })
                if matches!(
                    source.kind(),
                    ErrorKind::NotFound | ErrorKind::NotADirectory
                ) =>
            {
                debug!(
                    "No config file at {}, using defaults",
                    path.best_effort_path_display()
                );
                Ok(Self::default())
            }
            result => result,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ScanConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    fn from_mapping(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, ScanConfigError> {
        for key in top_level.keys() {
            match key.as_str() {
                Some(name) if KNOWN_KEYS.contains(&name) => {}
                _ => debug!("Ignoring unknown config entry: {:?}", key),
            }
        }

        let depth = Self::get_integer(top_level, "depth")?
            .map(|depth| {
                u32::try_from(depth).map_err(|_| ScanConfigError::InvalidValue {
                    key: "depth".to_string(),
                    expected: "a non-negative integer",
                })
            })
            .transpose()?;

        Ok(Self {
            hash_files: Self::get_bool(top_level, "hash_files")?,
            recursive: Self::get_bool(top_level, "recursive")?,
            depth,
            legacy_budget: Self::get_integer(top_level, "legacy_budget")?,
            snapshot: Self::get_string(top_level, "snapshot")?.map(PathBuf::from),
        })
    }

    fn lookup<'a, 'input>(
        top_level: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
        key: &'static str,
    ) -> Option<&'a Yaml<'input>> {
        match top_level.get(&Yaml::Value(Scalar::String(key.into()))) {
            None | Some(Yaml::Value(Scalar::Null)) => None,
            Some(value) => Some(value),
        }
    }

    fn get_bool(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<bool>, ScanConfigError> {
        match Self::lookup(top_level, key) {
            None => Ok(None),
            Some(Yaml::Value(Scalar::Boolean(value))) => Ok(Some(*value)),
            Some(_) => InvalidValueSnafu {
                key,
                expected: "a boolean",
            }
            .fail(),
        }
    }

    fn get_integer(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<i64>, ScanConfigError> {
        match Self::lookup(top_level, key) {
            None => Ok(None),
            Some(Yaml::Value(Scalar::Integer(value))) => Ok(Some(*value)),
            Some(_) => InvalidValueSnafu {
                key,
                expected: "an integer",
            }
            .fail(),
        }
    }

    fn get_string(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<String>, ScanConfigError> {
        match Self::lookup(top_level, key) {
            None => Ok(None),
            Some(value) => match value.as_str() {
                Some(value) => Ok(Some(value.to_string())),
                None => InvalidValueSnafu {
                    key,
                    expected: "a string",
                }
                .fail(),
            },
        }
    }
}

impl TryFrom<&str> for ScanConfig {
    type Error = ScanConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| ScanConfigError::ParseError { source: e })?;

        // An empty file holds no document at all
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };

        let top_level = document
            .as_mapping()
            .ok_or(ScanConfigError::TopLevelNotMap)?;

        Self::from_mapping(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum ScanConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config entry '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[test]
    fn config_defaults_when_file_is_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = ScanConfig::read(temp_dir.path());
        assert_eq!(result.ok(), Some(ScanConfig::default()));
    }

    #[test]
    fn config_reads_file_from_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "hash_files: true\ndepth: 2\n",
        )
        .expect("Failed to write config");

        let config = ScanConfig::read(temp_dir.path()).expect("Failed to read config");

        assert_eq!(config.hash_files, Some(true));
        assert_eq!(config.depth, Some(2));
        assert_eq!(config.recursive, None);
    }

    #[test]
    fn config_returns_error_on_nonexistent_file() {
        let result = ScanConfig::from_path(Path::new("nonexistent.yaml"));
        assert!(matches!(result, Err(ScanConfigError::ReadError { .. })));
    }

    #[test]
    fn config_returns_error_on_invalid_yaml() {
        let invalid_yaml = "invalid: yaml: content: [unclosed";
        let result: Result<ScanConfig, _> = invalid_yaml.try_into();
        assert!(matches!(result, Err(ScanConfigError::ParseError { .. })));
    }

    #[test]
    fn config_handles_empty_file() {
        let result: Result<ScanConfig, _> = "".try_into();
        assert_eq!(result.ok(), Some(ScanConfig::default()));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn config_returns_error_when_top_level_is_not_map(#[case] contents: &str) {
        let result: Result<ScanConfig, _> = contents.try_into();
        assert!(matches!(result, Err(ScanConfigError::TopLevelNotMap)));
    }

    #[test]
    fn config_parses_every_entry() {
        let contents = r#"
hash_files: true
recursive: false
depth: 3
legacy_budget: -1
snapshot: ".pathed/snapshot.bin"
"#;
        let config: ScanConfig = contents.try_into().expect("Failed to parse config");

        assert_eq!(
            config,
            ScanConfig {
                hash_files: Some(true),
                recursive: Some(false),
                depth: Some(3),
                legacy_budget: Some(-1),
                snapshot: Some(PathBuf::from(".pathed/snapshot.bin")),
            }
        );
    }

    #[rstest]
    #[case("hash_files: 1", "hash_files")]
    #[case("recursive: \"yes please\"", "recursive")]
    #[case("depth: -2", "depth")]
    #[case("depth: deep", "depth")]
    #[case("snapshot: [a, b]", "snapshot")]
    fn config_rejects_wrongly_typed_entries(#[case] contents: &str, #[case] expected_key: &str) {
        let result: Result<ScanConfig, _> = contents.try_into();
        match result {
            Err(ScanConfigError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn config_treats_null_entries_as_unset() {
        let result: Result<ScanConfig, _> = "hash_files:\ndepth: ~".try_into();
        assert_eq!(result.ok(), Some(ScanConfig::default()));
    }

    #[test]
    fn config_ignores_unknown_entries() {
        let contents = r#"
hash_files: true
colour: blue
123: "numeric key"
"#;
        let config: ScanConfig = contents.try_into().expect("Failed to parse config");
        assert_eq!(config.hash_files, Some(true));
    }

    #[test]
    fn config_error_display_names_the_entry() {
        let error = ScanConfigError::InvalidValue {
            key: "depth".to_string(),
            expected: "a non-negative integer",
        };
        assert_eq!(
            error.to_string(),
            "Config entry 'depth' should be a non-negative integer"
        );
    }
}
