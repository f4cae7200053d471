//! Oinfo CLI - query and test system attributes.

use std::process;

use clap::{CommandFactory, Parser};
use oinfo::cli::{Action, Cli};
use oinfo::commands;
use oinfo::config::Paths;
use oinfo::eval::Outcome;
use oinfo::{EXIT_NOTFOUND, Error};

fn main() {
    // Exit code 2 is reserved for key-not-found, so clap's default error
    // code cannot be used; argument errors are fatal (1) like every other.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    init_logging(cli.debug);

    if let Err(err) = cli.validate() {
        fatal(&err);
    }

    let paths = Paths::from_env();

    if cli.list {
        match commands::list_keys(&paths) {
            Ok(keys) => {
                for key in keys {
                    println!(" - {}", key);
                }
                return;
            }
            Err(err) => fatal(&err),
        }
    }

    let action = match cli.action() {
        Ok(action) => action,
        Err(err) => fatal(&err),
    };

    match action {
        Action::Help => {
            let _ = Cli::command().print_help();
        }
        Action::Values(keys) => {
            // Stdout is line-buffered, so values written before a missing
            // key survive the early exit.
            let mut stdout = std::io::stdout();
            match commands::output_values(&paths, &keys, cli.value_format(), &mut stdout) {
                Ok(()) => {}
                Err(Error::KeyNotFound(key)) => {
                    eprintln!("Error: Key '{}' not found", key);
                    process::exit(EXIT_NOTFOUND);
                }
                Err(err) => fatal(&err),
            }
        }
        Action::Tests(tests) => match commands::run_tests(&paths, &tests, cli.and, cli.or) {
            Ok(outcome) => {
                if !cli.quiet && outcome != Outcome::NotFound {
                    println!("{}", outcome.as_yes_no());
                }
                process::exit(outcome.code());
            }
            Err(err) => fatal(&err),
        },
    }
}

/// Print a fatal error and exit 1.
fn fatal(err: &Error) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}

/// Route diagnostics to stderr. Default level is WARN so source validation
/// warnings are visible; `--debug` raises it to DEBUG, and `OINFO_LOG`
/// overrides both with a full filter spec.
fn init_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("OINFO_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();
}
