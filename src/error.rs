use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all operations in the `archive-builder` crate.
///
/// Every variant except [`PackError::NoSources`] is an I/O failure that aborts
/// the whole build.
#[derive(Debug, Error)]
pub enum PackError {
    /// No source files were given (or every directory expanded to nothing).
    #[error("no input files specified (via command line, config file or EXTRA_ROMDISK_FILES)")]
    NoSources,

    /// The destination image could not be created or truncated.
    #[error("cannot create output file '{}': {source}", .path.display())]
    DestinationCreate { path: PathBuf, source: std::io::Error },

    /// A source path could not be stat'd.
    #[error("cannot stat '{}': {source}", .path.display())]
    SourceMetadata { path: PathBuf, source: std::io::Error },

    /// A source file could not be opened or read.
    #[error("couldn't read file '{}': {source}", .path.display())]
    SourceRead { path: PathBuf, source: std::io::Error },

    /// Writing to the destination image failed.
    #[error("write to '{}' failed: {source}", .path.display())]
    DestinationWrite { path: PathBuf, source: std::io::Error },

    /// A source changed size between the directory pass and the payload pass.
    #[error(
        "'{}' changed while packing: expected {expected} bytes, streamed {actual}",
        .path.display()
    )]
    SourceChanged { path: PathBuf, expected: u64, actual: u64 },

    /// A source (or the image as a whole) does not fit the 32-bit size/offset fields.
    #[error("'{}' is too large for the image format ({size} bytes)", .path.display())]
    SourceTooLarge { path: PathBuf, size: u64 },

    /// More sources than the 16-bit entry count can describe.
    #[error("too many input files: {0} (at most 65535)")]
    TooManyEntries(usize),

    /// The Kconfig-style configuration file could not be read or parsed.
    #[error("cannot read config file '{}': {source}", .path.display())]
    Config { path: PathBuf, source: dotenvy::Error },

    /// An image being read back is truncated or inconsistent.
    #[error("malformed image: {0}")]
    Malformed(String),
}

impl PackError {
    /// True for operator mistakes, as opposed to I/O failures.
    pub fn is_usage(&self) -> bool {
        matches!(self, PackError::NoSources)
    }
}
