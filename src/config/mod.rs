mod scan_config;

pub use scan_config::{ScanConfig, ScanConfigError};
