pub(crate) const DEFAULT_USER_AGENT: &str = concat!("hammer/", env!("CARGO_PKG_VERSION"));

/// Config files picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["hammer.toml", "hammer.json"];

pub(super) const DEFAULT_WORKERS: &str = "100";
pub(super) const DEFAULT_RATE: &str = "1";
pub(super) const DEFAULT_TIMEOUT: &str = "1s";
pub(super) const DEFAULT_WINDOW: &str = "1s";
pub(super) const DEFAULT_REFRESH: &str = "100ms";
pub(super) const DEFAULT_REPORT_INTERVAL: &str = "1s";
pub(super) const DEFAULT_WORKER_STEP: &str = "10";
