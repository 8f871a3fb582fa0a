//! The `jsonscan` command-line tool.
//!
//! Checks that a file (or standard input) holds exactly one well-formed JSON
//! document, or dumps its token sequence with `--tokens`.
//!
//! Exit status: 0 when the input is valid, 1 when it is not, 2 when it
//! could not be read.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use jsonscan::{
    tokenize_with, validate_reader, Dialect, ErrorKind, Options, ParseError, ReaderSource,
    TokenKind, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_SIZE,
};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonscan")]
#[command(about = "Check that the input is one well-formed JSON document", long_about = None)]
#[command(version)]
struct Cli {
    /// File to check, or `-` for standard input.
    path: PathBuf,

    /// Print the token sequence instead of validating.
    #[arg(short, long)]
    tokens: bool,

    /// Accept permissive numbers and raw control characters in strings.
    #[arg(long)]
    legacy: bool,

    /// Maximum number of nested objects and arrays.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum input size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_SIZE)]
    max_size: u64,

    /// Print no verdict or diagnostic; report only through the exit status.
    #[arg(short, long)]
    quiet: bool,

    /// Log more (-v info, -vv debug, -vvv every token).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> Options {
        let dialect = if self.legacy {
            Dialect::Legacy
        } else {
            Dialect::Strict
        };
        Options::default()
            .with_dialect(dialect)
            .with_max_depth(self.max_depth)
            .with_max_input_size(self.max_size)
    }

    fn open(&self) -> Result<Box<dyn Read>> {
        if self.path.as_os_str() == "-" {
            return Ok(Box::new(io::stdin().lock()));
        }
        let file = File::open(&self.path)
            .with_context(|| format!("Could not open {} for reading", self.path.display()))?;
        Ok(Box::new(file))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Maps a failed pass to an exit status: unreadable input is 2, anything
/// wrong with the document itself is 1.
fn failure_code(error: &ParseError) -> ExitCode {
    match error.kind {
        ErrorKind::Io(_) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn dump_tokens(cli: &Cli, reader: Box<dyn Read>) -> ExitCode {
    let stream = tokenize_with(ReaderSource::new(reader), &cli.options());
    for token in stream.tokens() {
        match token.kind {
            TokenKind::Eof => println!("End of file"),
            TokenKind::Error => println!("Error, quitting"),
            kind => println!("Token: {}", kind.name()),
        }
    }
    match stream.error() {
        Some(error) => {
            if !cli.quiet {
                eprintln!("{}: {error}", cli.path.display());
            }
            failure_code(error)
        }
        None => ExitCode::SUCCESS,
    }
}

fn check(cli: &Cli, reader: Box<dyn Read>) -> ExitCode {
    match validate_reader(reader, &cli.options()) {
        Ok(kind) => {
            if !cli.quiet {
                println!("{}: valid JSON ({kind})", cli.path.display());
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            if !cli.quiet {
                eprintln!("{}: {error}", cli.path.display());
            }
            failure_code(&error)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let reader = cli.open()?;
    info!(path = %cli.path.display(), "Loaded, scanning");

    if cli.tokens {
        Ok(dump_tokens(cli, reader))
    } else {
        Ok(check(cli, reader))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("jsonscan: {err:#}");
            ExitCode::from(2)
        }
    }
}
