use std::io;
use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute against the current directory and strips `.` and
/// `..` components without touching the filesystem, so symlinks are kept as
/// they were named.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    Ok(normalize_path(&absolute))
}

pub fn best_effort_path_display(path: &Path) -> String {
    match absolutize(path) {
        Ok(absolute_path) => absolute_path.display().to_string(),
        Err(_) => normalize_path(path).display().to_string(),
    }
}

/// Final component of `path`, or an empty string for a filesystem root.
pub fn path_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` never climbs above the root
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else if components.is_empty() {
                    components.push(component);
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}
