//! Main entry point for the archive-builder CLI app

use archive_builder::cli::{self, Args};
use archive_builder::{pack, sources, PackError};
use clap::error::ErrorKind;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Wrong arguments, or nothing to pack.
const EXIT_USAGE: u8 = 1;
/// Any failure creating, reading or writing files.
const EXIT_IO: u8 = 2;

fn main() -> ExitCode {
    let args = match cli::parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };
    init_logging(&args);

    if let Err(e) = run_app(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::from(if e.is_usage() { EXIT_USAGE } else { EXIT_IO });
    }
    ExitCode::SUCCESS
}

fn run_app(args: &Args) -> Result<(), PackError> {
    let config = args.load_config()?;
    let files = sources::collect_sources(&args.source_list(&config), &config)?;
    pack::pack_archive(&args.output, &files, &args.pack_options())?;
    Ok(())
}

fn init_logging(args: &Args) {
    // RUST_LOG wins over -v/-d
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
