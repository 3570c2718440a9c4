//! Payload pass: copies every source into the image, in table order.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use super::{ArchiveWriter, DirectoryEntry};
use crate::error::PackError;

/// Default size of the intermediate copy buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
/// Largest copy buffer that will be allocated; bigger requests are clamped.
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Streams each source into `writer` through a buffer of `buffer_size` bytes,
/// clamped to `1..=MAX_BUFFER_SIZE`.
///
/// `entries` must be the records produced for the same `sources`, in the same
/// order; the writer must already sit right after the directory table. Each
/// source is opened, drained and closed before the next one is opened.
/// Returns the number of payload bytes written.
pub fn stream_payloads<W: Write, P: AsRef<Path>>(
    writer: &mut ArchiveWriter<W>,
    sources: &[P],
    entries: &[DirectoryEntry],
    buffer_size: usize,
    destination: &Path,
) -> Result<u64, PackError> {
    debug_assert_eq!(sources.len(), entries.len());
    let mut buf = vec![0u8; buffer_size.clamp(1, MAX_BUFFER_SIZE)];
    let mut total: u64 = 0;

    for (source, entry) in sources.iter().zip(entries) {
        let path = source.as_ref();
        debug_assert_eq!(writer.current_offset(), u64::from(entry.offset));

        let read_err = |e| PackError::SourceRead {
            path: path.to_path_buf(),
            source: e,
        };
        let mut file = File::open(path).map_err(read_err)?;
        let mut copied: u64 = 0;
        loop {
            let n = match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_err(e)),
            };
            copied += n as u64;
            if copied > u64::from(entry.size) {
                break;
            }
            writer.write_payload(&buf[..n]).map_err(|e| PackError::DestinationWrite {
                path: destination.to_path_buf(),
                source: e,
            })?;
        }

        if copied != u64::from(entry.size) {
            return Err(PackError::SourceChanged {
                path: path.to_path_buf(),
                expected: u64::from(entry.size),
                actual: copied,
            });
        }
        debug!(path = %path.display(), bytes = copied, "payload streamed");
        total += copied;
    }
    Ok(total)
}
