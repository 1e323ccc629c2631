mod app;
mod args;
mod config;
mod engine;
mod entry;
mod error;
mod executor;
mod logger;
mod shutdown;
mod shutdown_handlers;
mod ui;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
