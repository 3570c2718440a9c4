//! # Romdisk Image Format
//!
//! This module defines the flat image consumed by the target's raw-table file system:
//!
//! 1.  **Entry count**: `u16`, little-endian.
//! 2.  **Directory table**: `count` records of [`ENTRY_SIZE`] bytes each (see [`DirectoryEntry`]).
//! 3.  **Payload**: the contents of every file, concatenated in table order, with no padding.
//!
//! Every multi-byte field is written with explicit little-endian conversion, so the
//! image is identical whatever the host byte order.

pub mod directory;
pub mod payload;

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::Path;

use crate::timestamp::{PackedDate, PACKED_DATE_SIZE};

/// Size of the leading entry count field.
pub const COUNT_SIZE: usize = 2;
/// Size of one directory record.
pub const ENTRY_SIZE: usize = 32;
/// Size of the name field, terminator included when it fits.
pub const NAME_LEN: usize = 16;

/// Offset of the first payload byte for an image holding `count` entries.
pub const fn payload_start(count: usize) -> u64 {
    (COUNT_SIZE + ENTRY_SIZE * count) as u64
}

/// One fixed-size record of the directory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Base name, NUL padded. A 16-byte name carries no terminator.
    pub name: [u8; NAME_LEN],
    /// Payload length in bytes.
    pub size: u32,
    /// Payload position, counted from the start of the image.
    pub offset: u32,
    /// Last modification date.
    pub date: PackedDate,
}

impl DirectoryEntry {
    pub const SIZE: usize = ENTRY_SIZE;

    /// Serialize into the 32-byte on-disk record.
    pub fn encode(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out[..NAME_LEN].copy_from_slice(&self.name);
        out[16..20].copy_from_slice(&self.size.to_le_bytes());
        out[20..24].copy_from_slice(&self.offset.to_le_bytes());
        out[24..].copy_from_slice(&self.date.to_bytes());
        out
    }

    pub fn decode(raw: &[u8; ENTRY_SIZE]) -> Self {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&raw[..NAME_LEN]);
        let mut size = [0u8; 4];
        size.copy_from_slice(&raw[16..20]);
        let mut offset = [0u8; 4];
        offset.copy_from_slice(&raw[20..24]);
        let mut date = [0u8; PACKED_DATE_SIZE];
        date.copy_from_slice(&raw[24..]);
        Self {
            name,
            size: u32::from_le_bytes(size),
            offset: u32::from_le_bytes(offset),
            date: PackedDate::from_bytes(&date),
        }
    }

    /// The stored name up to the first NUL, lossily decoded.
    pub fn name_str(&self) -> String {
        let len = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.name[..len]).into_owned()
    }

    /// Byte range of this entry's payload inside the image.
    pub fn payload_range(&self) -> std::ops::Range<u64> {
        let start = u64::from(self.offset);
        start..start + u64::from(self.size)
    }
}

/// Build the name field from the last component of `path`.
///
/// Returns the field and whether the name had to be truncated.
pub fn entry_name(path: &Path) -> ([u8; NAME_LEN], bool) {
    let mut name = [0u8; NAME_LEN];
    let base = path.file_name().map(name_bytes).unwrap_or_default();
    let bytes = &base[..];
    let len = bytes.len().min(NAME_LEN);
    name[..len].copy_from_slice(&bytes[..len]);
    (name, bytes.len() > NAME_LEN)
}

/// Raw bytes of a file name, copied as-is like `strncpy` would.
#[cfg(unix)]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    name.to_string_lossy().into_owned().into_bytes()
}

/// A writer responsible for laying out a romdisk image.
///
/// The count and the directory table must be written before any payload; the
/// writer tracks the current offset so callers can check payload positions.
pub struct ArchiveWriter<W: Write> {
    writer: W,
    current_offset: u64,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, current_offset: 0 }
    }

    /// Writes the leading entry count.
    pub fn write_header(&mut self, count: u16) -> io::Result<()> {
        self.writer.write_all(&count.to_le_bytes())?;
        self.current_offset += COUNT_SIZE as u64;
        Ok(())
    }

    /// Appends one record to the directory table.
    pub fn write_entry(&mut self, entry: &DirectoryEntry) -> io::Result<()> {
        self.writer.write_all(&entry.encode())?;
        self.current_offset += ENTRY_SIZE as u64;
        Ok(())
    }

    /// Appends raw payload bytes.
    pub fn write_payload(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.current_offset += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far, i.e. the offset of the next byte.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Flushes and hands back the underlying writer.
    pub fn finalize(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
