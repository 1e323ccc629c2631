use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use url::Url;

use crate::app::run_hammer;
use crate::args::parsers::{no_color_requested, validate_target_url};
use crate::args::{DEFAULT_CONFIG_FILES, HammerArgs};
use crate::error::{AppError, AppResult, ValidationError};
use crate::logger::{LogSettings, init_logging};

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    apply_config(&mut args, &matches)?;
    if no_color_requested(std::env::var_os("NO_COLOR").as_deref()) {
        args.no_color = true;
    }
    let target = resolve_target(&args)?;
    let ui_enabled = !args.no_ui && std::io::stdout().is_terminal();

    init_logging(&LogSettings {
        verbose: args.verbose,
        no_color: args.no_color,
        log_file: args.log_file.as_deref().map(Path::new),
        terminal_ui: ui_enabled,
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_hammer(&args, &target, ui_enabled))
}

fn parse_args() -> AppResult<Option<(HammerArgs, ArgMatches)>> {
    let mut cmd = HammerArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = HammerArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn apply_config(args: &mut HammerArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}

fn resolve_target(args: &HammerArgs) -> AppResult<Url> {
    let url = args
        .url
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
    validate_target_url(url)
}
