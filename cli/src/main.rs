//! flatcopy - Command-line front end for the flat copy engine.
//!
//! Takes a source and a destination directory, copies every regular file of
//! the source tree into the destination, and logs each step to `flatcopy.log`
//! in the working directory.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use engine::{run_copy, CopyOptions, Logger, DEFAULT_LOG_FILE};

/// flatcopy - Copy a directory tree into one flat directory
#[derive(Parser, Debug)]
#[command(name = "flatcopy")]
#[command(version)]
#[command(about = "Copy every file of a directory tree into a single flat directory")]
struct Args {
    /// Source directory (walked recursively)
    #[arg(value_name = "KAYNAK_DIZIN")]
    source: PathBuf,

    /// Destination directory (created if missing)
    #[arg(value_name = "HEDEF_DIZIN")]
    destination: PathBuf,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let exit_code = match panic::catch_unwind(AssertUnwindSafe(|| run_cli(&args))) {
        Ok(Ok(())) => 0,
        Ok(Err(msg)) => {
            eprintln!("Hata: {}", msg);
            1
        }
        Err(_) => {
            eprintln!("Beklenmedik bir hata olustu.");
            1
        }
    };

    process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<(), String> {
    let logger = Logger::open(DEFAULT_LOG_FILE);
    let options = CopyOptions::new(&args.source, &args.destination);
    run_copy(&options, &logger)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cli_takes_two_positionals() {
        let args = Args::try_parse_from(["flatcopy", "/from", "/to"]).expect("should parse");
        assert_eq!(args.source, PathBuf::from("/from"));
        assert_eq!(args.destination, PathBuf::from("/to"));
    }

    #[test]
    fn test_cli_rejects_wrong_argument_count() {
        assert!(Args::try_parse_from(["flatcopy"]).is_err());
        assert!(Args::try_parse_from(["flatcopy", "/from"]).is_err());
        assert!(Args::try_parse_from(["flatcopy", "/a", "/b", "/c"]).is_err());
    }

    #[test]
    fn test_cli_rejects_flags() {
        assert!(Args::try_parse_from(["flatcopy", "--overwrite", "/a", "/b"]).is_err());
    }
}
