mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::Cli;
use config::settings::Settings;

fn main() {
    let args = match Cli::try_parse_from(cli::normalize_args(std::env::args_os())) {
        Ok(args) => args,
        Err(e) => cli::exit_on_parse_error(e),
    };

    if args.help {
        cli::print_usage();
        std::process::exit(1);
    }

    cli::logging::init(args.verbose, args.quiet);

    let result = Settings::from_cli(&args).and_then(|settings| cli::run::execute(&settings));

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
