use clap::Parser;
use std::path::PathBuf;

use crate::archive::payload::{DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};
use crate::config::{self, RomdiskConfig};
use crate::error::PackError;
use crate::pack::PackOptions;
use crate::sources::SourceList;

/// Pack files into a flat romdisk image for the raw-table file system.
#[derive(Parser, Debug, Clone)]
#[command(name = "archive-builder", author, version, about, long_about = None)]
pub struct Args {
    /// The path of the image to create (truncated if it exists).
    pub output: PathBuf,

    /// One or more files to pack, in order. Directories are expanded one level deep.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Print one line per packed file and a summary.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print source provenance and offsets. Implies --verbose.
    #[arg(short, long)]
    pub debug: bool,

    /// Kconfig-style configuration file. Defaults to `$ZOS_PATH/os.conf`.
    #[arg(long, env = "KCONFIG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Size in bytes of the buffer used to copy file contents (at most 64 MiB).
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, value_parser = parse_buffer_size)]
    pub buffer_size: usize,

    /// Write to a temporary file and rename it over the output only on success.
    #[arg(long)]
    pub atomic: bool,
}

impl Args {
    /// Log filter implied by the verbosity flags.
    pub fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    pub fn pack_options(&self) -> PackOptions {
        PackOptions { buffer_size: self.buffer_size, atomic: self.atomic }
    }

    /// Loads the configuration file named by `--config`, or the default one if present.
    pub fn load_config(&self) -> Result<RomdiskConfig, PackError> {
        match &self.config {
            Some(path) => {
                if !path.exists() {
                    tracing::warn!("{} not found!", path.display());
                }
                RomdiskConfig::load(path)
            }
            None => RomdiskConfig::load(&config::default_config_path()),
        }
    }

    /// All candidate sources: command line, then config, then environment.
    pub fn source_list(&self, config: &RomdiskConfig) -> SourceList {
        SourceList {
            command_line: self.inputs.clone(),
            config: config.extra_files.clone(),
            environment: config::env_extra_files(),
        }
    }
}

fn parse_buffer_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{e}"))?;
    if size == 0 {
        return Err("buffer size must be at least 1 byte".into());
    }
    if size > MAX_BUFFER_SIZE {
        return Err(format!("buffer size must be at most {MAX_BUFFER_SIZE} bytes"));
    }
    Ok(size)
}

/// Parses command-line arguments without exiting, so the caller picks the exit status.
pub fn parse_from<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args)
}
