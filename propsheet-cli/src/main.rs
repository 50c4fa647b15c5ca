mod commands;
mod config;
mod error;
mod logging;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use clap::Parser;
use tracing::debug;

use crate::config::{Cli, Commands};
use crate::error::CliError;
use crate::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Convert {
            infile,
            outfile,
            verbose,
        } => cmd_convert(infile.as_deref(), outfile.as_deref(), verbose),
        Commands::Regex { pattern, debug } => cmd_regex(&pattern, debug),
    }
}

fn fail(error: &CliError, source: Option<&str>) -> ! {
    eprintln!("{}", error.render(source));
    std::process::exit(1);
}

fn read_input(infile: Option<&Path>) -> Result<String, CliError> {
    match infile {
        Some(path) => {
            debug!(path = %path.display(), "reading props");
            let file = File::open(path).map_err(|source| CliError::File {
                path: path.to_path_buf(),
                source,
            })?;
            commands::read_source(file)
        }
        None => commands::read_source(io::stdin().lock()),
    }
}

fn write_output(outfile: Option<&Path>, json: &str) -> Result<(), CliError> {
    match outfile {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::File {
                path: path.to_path_buf(),
                source,
            })?;
            commands::write_output(BufWriter::new(file), json)
        }
        None => commands::write_output(io::stdout().lock(), json),
    }
}

fn cmd_convert(infile: Option<&Path>, outfile: Option<&Path>, verbose: bool) {
    let source = match read_input(infile) {
        Ok(source) => source,
        Err(e) => fail(&e, None),
    };

    // Compile before touching the output so a failure leaves it intact.
    let json = match commands::convert_source(&source, verbose) {
        Ok(json) => json,
        Err(e) => fail(&e, Some(&source)),
    };

    if let Err(e) = write_output(outfile, &json) {
        fail(&e, None);
    }
}

fn cmd_regex(pattern: &str, debug: bool) {
    if let Err(e) = commands::describe_pattern(io::stdout().lock(), pattern, debug) {
        fail(&e, Some(pattern));
    }
}
