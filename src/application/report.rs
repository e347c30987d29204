use std::fmt;
use std::time::SystemTime;

use colored::Colorize;
use pathed::ext::SystemTimeExt;
use pathed::filesystem::{ContentHash, Directory, File, Tree};
use pathed::snapshot::Change;

const INDENT: &str = "  ";

/// Indented listing of a scanned tree followed by a summary line.
pub struct Report<'a> {
    tree: &'a Tree,
    now: SystemTime,
}

impl<'a> Report<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        Self::at(tree, SystemTime::now())
    }

    /// Renders file ages relative to `now` instead of the current time.
    pub fn at(tree: &'a Tree, now: SystemTime) -> Self {
        Self { tree, now }
    }

    fn fmt_directory(
        &self,
        f: &mut fmt::Formatter<'_>,
        directory: &Directory,
        level: usize,
    ) -> fmt::Result {
        for sub_dir in self.tree.sub_dirs(directory) {
            writeln!(
                f,
                "{}{}",
                INDENT.repeat(level),
                format!("{}/", sub_dir.name()).blue().bold()
            )?;
            self.fmt_directory(f, sub_dir, level + 1)?;
        }

        for file in self.tree.files(directory) {
            self.fmt_file(f, file, level)?;
        }

        Ok(())
    }

    fn fmt_file(&self, f: &mut fmt::Formatter<'_>, file: &File, level: usize) -> fmt::Result {
        write!(
            f,
            "{}{}  {} B  {}",
            INDENT.repeat(level),
            file.name(),
            file.filesize(),
            file.meta().last_modified().age_display(self.now)
        )?;

        match file.cached_hash() {
            Some(ContentHash::Empty) => write!(f, "  {}", "(empty)".dimmed())?,
            Some(hash) => write!(f, "  {}", hash.to_hex().dimmed())?,
            None => {}
        }

        writeln!(f)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.tree.root();
        writeln!(f, "{}", root.path().display().to_string().blue().bold())?;
        self.fmt_directory(f, root, 1)?;

        let stats = self.tree.stats();
        write!(
            f,
            "{} directories, {} files, {} bytes",
            stats.directories, stats.files, stats.total_bytes
        )?;
        if stats.skipped_directories > 0 {
            write!(
                f,
                ", {} directories beyond the depth limit",
                stats.skipped_directories
            )?;
        }
        writeln!(f)
    }
}

/// Snapshot differences, one per line.
pub struct ChangeList<'a>(pub &'a [Change]);

impl fmt::Display for ChangeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No changes since the last snapshot");
        }

        for change in self.0 {
            let line = change.to_string();
            let line = match change {
                Change::Added(_) => line.green(),
                Change::Removed(_) => line.red(),
                Change::Modified(_) => line.yellow(),
            };
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
