use clap::Parser;

use crate::error::{AppError, AppResult};

use super::HammerArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<HammerArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    HammerArgs::try_parse_from(args).map_err(AppError::from)
}
