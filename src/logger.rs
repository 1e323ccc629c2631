use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::error::AppResult;

/// Options that decide where logs go and how much is kept.
#[derive(Debug, Clone, Copy)]
pub struct LogSettings<'settings> {
    pub verbose: bool,
    pub no_color: bool,
    pub log_file: Option<&'settings Path>,
    /// The dashboard owns the terminal.
    pub terminal_ui: bool,
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error when the log file cannot be opened.
pub fn init_logging(settings: &LogSettings<'_>) -> AppResult<()> {
    let quiet_terminal = settings.terminal_ui && settings.log_file.is_none();
    let filter = build_filter(settings.verbose, quiet_terminal);

    match settings.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            install(filter, false, Mutex::new(file));
        }
        None => install(filter, !settings.no_color, std::io::stderr),
    }
    Ok(())
}

/// Filter from `HAMMER_LOG`, then `RUST_LOG`, else by verbosity. While the
/// dashboard draws on the terminal only warnings and errors pass.
pub(crate) fn build_filter(verbose: bool, quiet_terminal: bool) -> EnvFilter {
    if quiet_terminal {
        return EnvFilter::new("warn");
    }
    std::env::var("HAMMER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(default_directive(verbose)),
            |value| {
                EnvFilter::try_new(value)
                    .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
            },
        )
}

const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn install<W>(filter: EnvFilter, ansi: bool, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};

    #[test]
    fn init_logging_is_idempotent() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("hammer.log");
        let settings = LogSettings {
            verbose: false,
            no_color: true,
            log_file: Some(&path),
            terminal_ui: true,
        };
        init_logging(&settings)?;
        init_logging(&settings)?;
        if !path.exists() {
            return Err(AppError::validation("Expected the log file to be created"));
        }
        Ok(())
    }

    #[test]
    fn dashboard_without_log_file_only_shows_warnings() -> AppResult<()> {
        let filter = build_filter(true, true);
        if filter.to_string() != "warn" {
            return Err(AppError::validation(format!(
                "Unexpected filter: {}",
                filter
            )));
        }
        Ok(())
    }

    #[test]
    fn default_directive_follows_verbosity() -> AppResult<()> {
        if default_directive(true) != "debug" || default_directive(false) != "info" {
            return Err(AppError::validation("Unexpected default directive"));
        }
        Ok(())
    }
}
