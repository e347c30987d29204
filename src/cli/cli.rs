use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Scan a directory tree, show its files and report what changed.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// The directory to scan
    #[clap(default_value = ".")]
    pub root: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Hash file contents with BLAKE3 while scanning
    #[clap(long = "hash")]
    pub hash_files: bool,

    /// Descend into subdirectories without a depth limit
    #[clap(long, short)]
    pub recursive: bool,

    /// Descend at most this many directory levels below the root
    #[clap(long, short)]
    pub depth: Option<u32>,

    /// Legacy depth budget: a directory holding budget B >= 0 scans its
    /// subdirectories with budget B - 1
    #[clap(long, allow_negative_numbers = true, conflicts_with_all = ["recursive", "depth"])]
    pub legacy_budget: Option<i64>,

    /// Compare against the snapshot stored at this path, then update it
    #[clap(long)]
    pub snapshot: Option<PathBuf>,

    /// Never color the output
    #[clap(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["pathed"]).expect("Failed to parse arguments");
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(!cli.hash_files);
        assert!(!cli.recursive);
        assert_eq!(cli.depth, None);
        assert_eq!(cli.legacy_budget, None);
    }

    #[test]
    fn cli_parses_scan_flags() {
        let cli = Cli::try_parse_from([
            "pathed",
            "/srv/data",
            "--hash",
            "-d",
            "2",
            "--snapshot",
            "state.bin",
            "-l",
            "debug",
        ])
        .expect("Failed to parse arguments");

        assert_eq!(cli.root, PathBuf::from("/srv/data"));
        assert!(cli.hash_files);
        assert_eq!(cli.depth, Some(2));
        assert_eq!(cli.snapshot, Some(PathBuf::from("state.bin")));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn cli_accepts_negative_legacy_budget() {
        let cli = Cli::try_parse_from(["pathed", "--legacy-budget", "-1"])
            .expect("Failed to parse arguments");
        assert_eq!(cli.legacy_budget, Some(-1));
    }

    #[test]
    fn cli_rejects_legacy_budget_with_depth() {
        let result = Cli::try_parse_from(["pathed", "--legacy-budget", "1", "--depth", "2"]);
        assert!(result.is_err());
    }
}
