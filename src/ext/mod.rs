mod best_effort_path_ext;
mod system_time_ext;

pub use best_effort_path_ext::{BestEffortPathExt, absolutize, path_name};
pub use system_time_ext::SystemTimeExt;
