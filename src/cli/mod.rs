pub mod logging;
pub mod output;
pub mod run;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};

use crate::core::models::resolve_mode::ResolveMode;

/// Resolve Secret Manager references in a .env file.
#[derive(Parser, Debug)]
#[command(
    name = "envresolve",
    version,
    about,
    long_about = None,
    disable_help_flag = true,
    after_help = "Note: <INPUT> is a required positional argument."
)]
pub struct Cli {
    /// Env file whose secret references should be resolved
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Credential file for Secret Manager
    /// [default: ~/.config/gcloud/application_default_credentials.json]
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        hide_env_values = true
    )]
    pub credential: Option<PathBuf>,

    /// Escape \n, \t and ' in resolved secret values (plain mode only)
    #[arg(long)]
    pub remove_whitespace: bool,

    /// Secret reference convention [default: plain]
    #[arg(long, value_enum)]
    pub mode: Option<ResolveMode>,

    /// Secret Manager base URL
    #[arg(long, value_name = "URL", env = "SECRET_MANAGER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Sort output keys alphabetically instead of keeping input order
    #[arg(long)]
    pub sort: bool,

    /// Path to a TOML settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print usage and exit
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub help: bool,
}

/// Long options that may also be spelled with a single dash.
const LONG_OPTIONS: &[&str] = &[
    "output",
    "credential",
    "remove-whitespace",
    "mode",
    "endpoint",
    "sort",
    "config",
    "verbose",
    "quiet",
    "help",
    "version",
];

/// Rewrite single-dash long options (`-output x`, `-credential=y`) to
/// their double-dash form so older invocations keep working.
///
/// Everything after a bare `--` is left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if LONG_OPTIONS.contains(&name) {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

/// Print the usage text to stdout.
pub fn print_usage() {
    let _ = Cli::command().print_help();
}

/// Report a command-line error and terminate.
///
/// A missing input prints the full usage; every failure exits with
/// status 1. `--version` keeps clap's own behavior.
pub fn exit_on_parse_error(err: clap::Error) -> ! {
    match err.kind() {
        ErrorKind::DisplayVersion => err.exit(),
        ErrorKind::MissingRequiredArgument => print_usage(),
        _ => {
            let _ = err.print();
        }
    }
    std::process::exit(1)
}
