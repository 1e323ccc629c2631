//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::HammerArgs;
pub use types::{FetcherKind, PositiveUsize};

pub(crate) use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_USER_AGENT};
