mod app;
mod config;
mod executor;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use executor::ExecutorError;
pub use validation::ValidationError;
