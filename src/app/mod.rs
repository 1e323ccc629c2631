mod report;
mod runner;

pub(crate) use runner::run_hammer;
