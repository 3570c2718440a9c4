//! Directory pass: turns source metadata into table records with cumulative offsets.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{entry_name, payload_start, DirectoryEntry, NAME_LEN};
use crate::error::PackError;
use crate::timestamp::PackedDate;

/// Builds one record per source, in order, with offsets laid out back to back
/// starting right after the table.
///
/// Only metadata is queried; file contents are not touched.
pub fn build_directory<P: AsRef<Path>>(sources: &[P]) -> Result<Vec<DirectoryEntry>, PackError> {
    if sources.len() > usize::from(u16::MAX) {
        return Err(PackError::TooManyEntries(sources.len()));
    }

    let mut offset = payload_start(sources.len());
    let mut entries = Vec::with_capacity(sources.len());
    for source in sources {
        let path = source.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| PackError::SourceMetadata {
            path: path.to_path_buf(),
            source: e,
        })?;
        let modified = metadata.modified().map_err(|e| PackError::SourceMetadata {
            path: path.to_path_buf(),
            source: e,
        })?;

        let size = metadata.len();
        let entry = make_entry(path, size, offset, PackedDate::from_system_time(modified))?;
        debug!(name = %entry.name_str(), size, offset, "directory entry");
        offset += size;
        entries.push(entry);
    }
    Ok(entries)
}

/// Builds a single record, checking that size and offset fit the 32-bit fields.
pub fn make_entry(
    path: &Path,
    size: u64,
    offset: u64,
    date: PackedDate,
) -> Result<DirectoryEntry, PackError> {
    let too_large = |size| PackError::SourceTooLarge {
        path: PathBuf::from(path),
        size,
    };
    let size32 = u32::try_from(size).map_err(|_| too_large(size))?;
    let offset32 = u32::try_from(offset).map_err(|_| too_large(offset))?;
    // the payload must also end inside the addressable range
    offset32.checked_add(size32).ok_or_else(|| too_large(offset + size))?;

    let (name, truncated) = entry_name(path);
    if truncated {
        warn!(
            "Filename '{}' too long, truncating to {} characters.",
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            NAME_LEN
        );
    }

    Ok(DirectoryEntry { name, size: size32, offset: offset32, date })
}
