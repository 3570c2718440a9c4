//! Archive assembly: count, directory table, then payload, in that order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::archive::directory::build_directory;
use crate::archive::payload::{stream_payloads, DEFAULT_BUFFER_SIZE};
use crate::archive::{payload_start, ArchiveWriter};
use crate::error::PackError;

/// Knobs for [`pack_archive`].
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Size of the copy buffer used while streaming payloads. Zero is treated as one.
    pub buffer_size: usize,
    /// Write to a temporary file next to the destination and rename it on success.
    pub atomic: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self { buffer_size: DEFAULT_BUFFER_SIZE, atomic: false }
    }
}

/// What ended up in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSummary {
    pub entries: usize,
    pub payload_bytes: u64,
    pub image_bytes: u64,
}

/// Packs `sources` into a romdisk image at `destination`.
///
/// An empty source list is rejected before the destination is touched. On any
/// later failure the destination may be left truncated, unless
/// [`PackOptions::atomic`] is set.
pub fn pack_archive<P: AsRef<Path>>(
    destination: &Path,
    sources: &[P],
    options: &PackOptions,
) -> Result<PackSummary, PackError> {
    if sources.is_empty() {
        return Err(PackError::NoSources);
    }
    if sources.len() > usize::from(u16::MAX) {
        return Err(PackError::TooManyEntries(sources.len()));
    }

    let create_err = |e| PackError::DestinationCreate {
        path: destination.to_path_buf(),
        source: e,
    };
    let summary = if options.atomic {
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = temp_image(parent).map_err(create_err)?;
        debug!(tmp = %tmp.path().display(), "writing through temporary file");
        let (_, summary) = write_image(
            BufWriter::new(tmp.as_file_mut()),
            sources,
            options.buffer_size,
            destination,
        )?;
        let write_err = |e| PackError::DestinationWrite {
            path: destination.to_path_buf(),
            source: e,
        };
        // a replaced image keeps the mode it had
        if let Ok(existing) = std::fs::metadata(destination) {
            tmp.as_file().set_permissions(existing.permissions()).map_err(write_err)?;
        }
        tmp.persist(destination).map_err(|e| write_err(e.error))?;
        summary
    } else {
        let file = File::create(destination).map_err(create_err)?;
        let (_, summary) =
            write_image(BufWriter::new(file), sources, options.buffer_size, destination)?;
        summary
    };

    info!(
        "Packed {} files ({}B) into '{}'.",
        summary.entries,
        summary.payload_bytes,
        destination.display()
    );
    Ok(summary)
}

/// Creates the temporary image in `dir` with the mode `File::create` would use
/// (0666 minus the umask) rather than tempfile's private 0600.
fn temp_image(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".romdisk");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Writes a complete image for `sources` into `out`.
///
/// Both passes visit `sources` in the same order. `destination` is only used to
/// label write errors. The flushed writer is handed back on success.
pub fn write_image<W: Write, P: AsRef<Path>>(
    out: W,
    sources: &[P],
    buffer_size: usize,
    destination: &Path,
) -> Result<(W, PackSummary), PackError> {
    let write_err = |e| PackError::DestinationWrite {
        path: destination.to_path_buf(),
        source: e,
    };
    let count =
        u16::try_from(sources.len()).map_err(|_| PackError::TooManyEntries(sources.len()))?;

    let mut writer = ArchiveWriter::new(out);
    writer.write_header(count).map_err(write_err)?;

    let entries = build_directory(sources)?;
    for entry in &entries {
        info!("\t{:<16} {:>5}B", entry.name_str(), entry.size);
        writer.write_entry(entry).map_err(write_err)?;
    }

    let payload_bytes =
        stream_payloads(&mut writer, sources, &entries, buffer_size, destination)?;
    let image_bytes = writer.current_offset();
    debug_assert_eq!(image_bytes, payload_start(entries.len()) + payload_bytes);
    let out = writer.finalize().map_err(write_err)?;

    Ok((
        out,
        PackSummary { entries: entries.len(), payload_bytes, image_bytes },
    ))
}
