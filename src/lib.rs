//! # archive-builder Core Library
//!
//! This crate packs a list of files into the flat "romdisk" image mounted by a
//! read-only raw-table file system on small 8-bit targets.
//!
//! It is designed to be used by the `archive-builder` command-line application, but its
//! public API can also be used to build and inspect images programmatically.
//!
//! ## Key Modules
//!
//! - [`archive`]: The on-disk layout, directory records and the image writer.
//! - [`timestamp`]: Packed-decimal dates as the target's date API expects them.
//! - [`pack`]: Assembles a complete image from a list of sources.
//! - [`sources`] and [`config`]: Decide which files end up in the image.
//! - [`reader`]: Reads images back for listing and verification.
//!
//! ## Examples
//!
//! ```no_run
//! use archive_builder::pack::{pack_archive, PackOptions};
//! use std::path::Path;
//!
//! let sources = ["init.bin", "motd.txt"];
//! let summary = pack_archive(Path::new("disk.img"), &sources, &PackOptions::default())?;
//! println!("{} entries, {} bytes", summary.entries, summary.image_bytes);
//! # Ok::<(), archive_builder::PackError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod pack;
pub mod reader;
pub mod sources;
pub mod timestamp;

pub use error::PackError;
